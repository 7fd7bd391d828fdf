use ndarray::Array2;
use tracing::debug;

use crate::filters::levels::normalize;
use crate::frame::{ComplexField, Frame};
use crate::optics::apodization::ApodizationMask;
use crate::optics::kreuzer::{kreuzer_reconstruct, KreuzerGeometry};
use crate::optics::propagation::propagate_scaled;
use crate::params::{Algorithm, OutputMode, ReconstructionParameters};

/// Result of one reconstruction. Kreuzer only yields a real intensity.
#[derive(Clone, Debug)]
pub enum Reconstruction {
    Field(ComplexField),
    Intensity(Array2<f64>),
}

impl Reconstruction {
    pub fn dim(&self) -> (usize, usize) {
        match self {
            Self::Field(f) => f.dim(),
            Self::Intensity(i) => i.dim(),
        }
    }
}

/// Reconstruct a captured hologram frame with the selected algorithm.
///
/// The frame intensity is turned into a field amplitude first. Angular
/// spectrum propagates it over `r = L − Z` scaled by the magnification;
/// Kreuzer works on the amplitude with reconstruction pitch `Z·dxy/L`.
pub fn reconstruct_frame(
    frame: &Frame,
    params: &ReconstructionParameters,
    mask: &ApodizationMask,
) -> Reconstruction {
    let field = frame.to_field();
    match params.algorithm {
        Algorithm::AngularSpectrum => Reconstruction::Field(propagate_scaled(
            &field,
            params.r(),
            params.wavelength,
            params.pixel_pitch,
            params.pixel_pitch,
            params.magnification(),
        )),
        Algorithm::Kreuzer => {
            let geometry =
                KreuzerGeometry::new(params.z, params.l, params.wavelength, params.pixel_pitch);
            let amplitude = field.mapv(|v| v.re);
            Reconstruction::Intensity(kreuzer_reconstruct(&amplitude, &geometry, mask))
        }
    }
}

/// Representation requested by `mode`, normalized to `[0, 1]`.
///
/// A Kreuzer intensity has no phase; `Phase` falls back to the intensity and
/// `Amplitude` takes its square root.
pub fn render_output(reconstruction: &Reconstruction, mode: OutputMode) -> Array2<f32> {
    let values = match (reconstruction, mode) {
        (Reconstruction::Field(f), OutputMode::Intensity) => f.mapv(|v| v.norm_sqr()),
        (Reconstruction::Field(f), OutputMode::Amplitude) => f.mapv(|v| v.norm()),
        (Reconstruction::Field(f), OutputMode::Phase) => f.mapv(|v| v.arg()),
        (Reconstruction::Intensity(i), OutputMode::Amplitude) => i.mapv(|v| v.max(0.0).sqrt()),
        (Reconstruction::Intensity(i), OutputMode::Intensity) => i.clone(),
        (Reconstruction::Intensity(i), OutputMode::Phase) => {
            debug!("Kreuzer output has no phase, rendering intensity");
            i.clone()
        }
    };
    normalize(&values, 1.0).mapv(|v| v as f32)
}
