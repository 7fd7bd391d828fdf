pub mod frequency;
pub mod gaussian;
pub mod histogram;
pub mod levels;

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

use frequency::{frequency_filter, PassBand};
use histogram::adaptive_equalize;
use levels::{brightness_contrast, gamma_correct};

/// One post-processing step applied to captured or reconstructed frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FilterStep {
    Gamma { gamma: f32, gain: f32 },
    Contrast { brightness: f32, contrast: f32 },
    AdaptiveEqualization { tiles: usize, clip_limit: f32 },
    HighPass { cutoff: f32 },
    LowPass { cutoff: f32 },
}

impl std::fmt::Display for FilterStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gamma { gamma, gain } => write!(f, "Gamma ({gamma}, gain {gain})"),
            Self::Contrast {
                brightness,
                contrast,
            } => write!(f, "Contrast ({contrast}, brightness {brightness})"),
            Self::AdaptiveEqualization { tiles, clip_limit } => {
                write!(f, "Adaptive Equalization ({tiles} tiles, clip {clip_limit})")
            }
            Self::HighPass { cutoff } => write!(f, "High Pass ({cutoff})"),
            Self::LowPass { cutoff } => write!(f, "Low Pass ({cutoff})"),
        }
    }
}

/// Apply a single filter step to a frame.
pub fn apply_filter_step(frame: &Frame, step: &FilterStep) -> Frame {
    match step {
        FilterStep::Gamma { gamma, gain } => gamma_correct(frame, *gamma, *gain),
        FilterStep::Contrast {
            brightness,
            contrast,
        } => brightness_contrast(frame, *brightness, *contrast),
        FilterStep::AdaptiveEqualization { tiles, clip_limit } => {
            adaptive_equalize(frame, *tiles, *clip_limit)
        }
        FilterStep::HighPass { cutoff } => frequency_filter(frame, *cutoff, PassBand::High),
        FilterStep::LowPass { cutoff } => frequency_filter(frame, *cutoff, PassBand::Low),
    }
}

/// Apply steps in order. An empty chain returns the frame unchanged.
pub fn apply_filter_chain(frame: &Frame, steps: &[FilterStep]) -> Frame {
    let mut out = frame.clone();
    for step in steps {
        out = apply_filter_step(&out, step);
    }
    out.metadata = frame.metadata.clone();
    out
}
