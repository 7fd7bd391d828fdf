use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::SIDEBAND_MARGIN_FRACTION;
use crate::error::{DlhmError, Result};
use crate::frame::ComplexField;

use super::fft::{fft2_centered, to_complex};

/// Quadrant of the centered spectrum holding the wanted sideband, numbered
/// like the Cartesian plane (1 = top right, counter-clockwise).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    #[default]
    First,
    Second,
    Third,
    Fourth,
}

impl Quadrant {
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            4 => Ok(Self::Fourth),
            other => Err(DlhmError::InvalidParameter {
                name: "region".into(),
                reason: format!("quadrant must be 1-4, got {other}"),
            }),
        }
    }

    /// Half-open `(rows, cols)` ranges kept for an `n × m` spectrum.
    fn window(self, n: usize, m: usize) -> ((usize, usize), (usize, usize)) {
        let nf = n as f64;
        let mf = m as f64;
        let top_end = (nf / 2.0 - nf * SIDEBAND_MARGIN_FRACTION).round().max(0.0) as usize;
        let bottom_start = ((nf / 2.0 + nf * SIDEBAND_MARGIN_FRACTION).round() as usize).min(n);
        let left_end = (mf / 2.0 - mf * SIDEBAND_MARGIN_FRACTION).round().max(0.0) as usize;
        let right_start = ((mf / 2.0 + mf * SIDEBAND_MARGIN_FRACTION).round() as usize).min(m);

        match self {
            Self::First => ((0, top_end), (right_start, m)),
            Self::Second => ((0, top_end), (0, left_end)),
            Self::Third => ((bottom_start, n), (0, left_end)),
            Self::Fourth => ((bottom_start, n), (right_start, m)),
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let idx = match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
        };
        write!(f, "{idx}")
    }
}

/// Location of the strongest sample of the filtered spectrum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SidebandPeak {
    /// Row-major flattened index.
    pub index: usize,
    pub row: usize,
    pub col: usize,
}

/// Masked spectrum plus the peak of its log-power.
pub struct SidebandSpectrum {
    pub spectrum: ComplexField,
    pub peak: SidebandPeak,
}

/// Centered spectrum of `hologram` with everything outside the chosen
/// quadrant window zeroed.
///
/// The peak is the first maximum of `ln(|F|² + 1)` in row-major order; an
/// all-zero hologram therefore reports index 0.
pub fn filter_sideband(hologram: &Array2<f32>, quadrant: Quadrant) -> SidebandSpectrum {
    let (n, m) = hologram.dim();
    let mut spectrum = fft2_centered(&to_complex(hologram));
    let ((r0, r1), (c0, c1)) = quadrant.window(n, m);

    let mut best = SidebandPeak { index: 0, row: 0, col: 0 };
    let mut best_val = f64::NEG_INFINITY;

    for ((row, col), v) in spectrum.indexed_iter_mut() {
        let keep = row >= r0 && row < r1 && col >= c0 && col < c1;
        if !keep {
            *v = num_complex::Complex::new(0.0, 0.0);
        }
        let power = (v.norm_sqr() + 1.0).ln();
        if power > best_val {
            best_val = power;
            best = SidebandPeak {
                index: row * m + col,
                row,
                col,
            };
        }
    }

    SidebandSpectrum { spectrum, peak: best }
}
