use std::path::PathBuf;

use ndarray::Array2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH, DEFAULT_PIXEL_PITCH_UM, DEFAULT_WAVELENGTH_UM,
};
use crate::error::{DlhmError, Result};
use crate::frame::{Frame, FrameSize, SourceInfo};

use super::FrameSource;

/// In-line hologram of a single point scatterer: a spherical wave
/// `a · (d/R) · exp(i·k·R)` interfering with a unit plane reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticHologram {
    pub width: usize,
    pub height: usize,
    pub wavelength: f64,
    pub pixel_pitch: f64,
    /// Scatterer-to-sensor distance in micrometres.
    pub distance: f64,
    /// Object wave amplitude relative to the reference.
    pub contrast: f64,
    /// Scatterer offset from the sensor centre, in pixels `(x, y)`.
    pub offset: (f64, f64),
}

impl Default for SyntheticHologram {
    fn default() -> Self {
        Self {
            width: DEFAULT_CAPTURE_WIDTH as usize,
            height: DEFAULT_CAPTURE_HEIGHT as usize,
            wavelength: DEFAULT_WAVELENGTH_UM,
            pixel_pitch: DEFAULT_PIXEL_PITCH_UM,
            distance: 1_000.0,
            contrast: 0.5,
            offset: (0.0, 0.0),
        }
    }
}

impl SyntheticHologram {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DlhmError::InvalidDimensions {
                width: self.width as u32,
                height: self.height as u32,
            });
        }
        for (name, value) in [
            ("wavelength", self.wavelength),
            ("pixel_pitch", self.pixel_pitch),
            ("distance", self.distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(DlhmError::InvalidParameter {
                    name: name.into(),
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Recorded intensity, scaled so the brightest possible fringe is 1.
    pub fn render(&self) -> Array2<f32> {
        let k = std::f64::consts::TAU / self.wavelength;
        let cx = (self.width / 2) as f64 + self.offset.0;
        let cy = (self.height / 2) as f64 + self.offset.1;
        let d = self.distance;
        let peak = (1.0 + self.contrast.abs()).powi(2);

        Array2::from_shape_fn((self.height, self.width), |(row, col)| {
            let x = (col as f64 - cx) * self.pixel_pitch;
            let y = (row as f64 - cy) * self.pixel_pitch;
            let r = (d * d + x * x + y * y).sqrt();
            let object = Complex::from_polar(self.contrast * d / r, k * r);
            ((Complex::new(1.0, 0.0) + object).norm_sqr() / peak) as f32
        })
    }
}

/// Serves the same synthetic hologram every tick.
pub struct SyntheticSource {
    hologram: SyntheticHologram,
    frame: Frame,
    served: usize,
}

impl SyntheticSource {
    pub fn new(hologram: SyntheticHologram) -> Result<Self> {
        hologram
            .validate()
            .map_err(|e| DlhmError::SourceUnavailable(format!("synthetic hologram: {e}")))?;
        let frame = Frame::new(hologram.render(), 16);
        Ok(Self {
            hologram,
            frame,
            served: 0,
        })
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Frame> {
        let mut frame = self.frame.clone();
        frame.metadata.frame_index = self.served;
        self.served += 1;
        Ok(frame)
    }

    fn resolution(&self) -> FrameSize {
        FrameSize {
            width: self.hologram.width,
            height: self.hologram.height,
        }
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            filename: PathBuf::from("<synthetic>"),
            total_frames: 0,
            width: self.hologram.width as u32,
            height: self.hologram.height as u32,
            bit_depth: 16,
            observer: None,
            instrument: None,
        }
    }
}
