use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{
    DEFAULT_COSINE_PERIOD, DEFAULT_L_UM, DEFAULT_PIXEL_PITCH_UM, DEFAULT_WAVELENGTH_UM,
    DEFAULT_Z_UM,
};
use crate::error::{DlhmError, Result};

/// Reconstruction method applied by the reconstruct worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    AngularSpectrum,
    Kreuzer,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AngularSpectrum => write!(f, "Angular Spectrum"),
            Self::Kreuzer => write!(f, "Kreuzer"),
        }
    }
}

/// Representation of the reconstructed field sent to the display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    Amplitude,
    #[default]
    Intensity,
    Phase,
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Amplitude => write!(f, "Amplitude"),
            Self::Intensity => write!(f, "Intensity"),
            Self::Phase => write!(f, "Phase"),
        }
    }
}

/// Physical parameters of one reconstruction. Lengths in micrometres.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionParameters {
    /// Source-to-sensor distance.
    pub l: f64,
    /// Source-to-sample distance.
    pub z: f64,
    pub wavelength: f64,
    pub pixel_pitch: f64,
    pub algorithm: Algorithm,
    pub output_mode: OutputMode,
    /// Period of the Kreuzer apodization window.
    pub cosine_period: f64,
}

impl Default for ReconstructionParameters {
    fn default() -> Self {
        Self {
            l: DEFAULT_L_UM,
            z: DEFAULT_Z_UM,
            wavelength: DEFAULT_WAVELENGTH_UM,
            pixel_pitch: DEFAULT_PIXEL_PITCH_UM,
            algorithm: Algorithm::default(),
            output_mode: OutputMode::default(),
            cosine_period: DEFAULT_COSINE_PERIOD,
        }
    }
}

impl ReconstructionParameters {
    /// Reconstruction distance `L − Z`.
    pub fn r(&self) -> f64 {
        self.l - self.z
    }

    /// Optical magnification `L / Z`.
    pub fn magnification(&self) -> f64 {
        if self.z > 0.0 {
            self.l / self.z
        } else {
            1.0
        }
    }

    pub fn validate(&self) -> Result<()> {
        positive("wavelength", self.wavelength)?;
        positive("pixel_pitch", self.pixel_pitch)?;
        positive("cosine_period", self.cosine_period)?;
        positive("z", self.z)?;
        positive("l", self.l)?;
        if self.z > self.l {
            return Err(DlhmError::InvalidParameter {
                name: "z".into(),
                reason: format!("Z ({}) must not exceed L ({})", self.z, self.l),
            });
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DlhmError::InvalidParameter {
            name: name.into(),
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

/// Applies text edits to a parameter set, rejecting anything that does not
/// parse or would leave the set invalid. Rejected edits are logged and the
/// last valid values kept.
///
/// With `fix_r` on, editing `L` drags `Z` along so that `r` stays put, and
/// editing `Z` drags `L`. With it off, `L` and `Z` move independently and `r`
/// follows. Editing `r` always moves `Z`.
#[derive(Clone, Debug)]
pub struct ParameterEditor {
    params: ReconstructionParameters,
    fix_r: bool,
}

impl ParameterEditor {
    pub fn new(params: ReconstructionParameters) -> Self {
        Self {
            params,
            fix_r: false,
        }
    }

    pub fn params(&self) -> &ReconstructionParameters {
        &self.params
    }

    pub fn into_params(self) -> ReconstructionParameters {
        self.params
    }

    pub fn fix_r(&self) -> bool {
        self.fix_r
    }

    pub fn set_fix_r(&mut self, fix_r: bool) {
        self.fix_r = fix_r;
    }

    pub fn set_l(&mut self, text: &str) -> bool {
        let fix_r = self.fix_r;
        self.edit("l", text, |p, l| {
            if fix_r {
                p.z = l - p.r();
            }
            p.l = l;
        })
    }

    pub fn set_z(&mut self, text: &str) -> bool {
        let fix_r = self.fix_r;
        self.edit("z", text, |p, z| {
            if fix_r {
                p.l = z + p.r();
            }
            p.z = z;
        })
    }

    pub fn set_r(&mut self, text: &str) -> bool {
        self.edit("r", text, |p, r| p.z = p.l - r)
    }

    pub fn set_wavelength(&mut self, text: &str) -> bool {
        self.edit("wavelength", text, |p, v| p.wavelength = v)
    }

    pub fn set_pixel_pitch(&mut self, text: &str) -> bool {
        self.edit("pixel_pitch", text, |p, v| p.pixel_pitch = v)
    }

    pub fn set_cosine_period(&mut self, text: &str) -> bool {
        self.edit("cosine_period", text, |p, v| p.cosine_period = v)
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.params.algorithm = algorithm;
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.params.output_mode = mode;
    }

    fn edit(
        &mut self,
        name: &str,
        text: &str,
        apply: impl FnOnce(&mut ReconstructionParameters, f64),
    ) -> bool {
        let value = match text.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                warn!(parameter = name, input = text, "Ignoring non-numeric parameter entry");
                return false;
            }
        };

        let mut candidate = self.params.clone();
        apply(&mut candidate, value);

        match candidate.validate() {
            Ok(()) => {
                debug!(parameter = name, value, r = candidate.r(), "Parameter updated");
                self.params = candidate;
                true
            }
            Err(e) => {
                warn!(parameter = name, value, error = %e, "Rejected parameter entry");
                false
            }
        }
    }
}
