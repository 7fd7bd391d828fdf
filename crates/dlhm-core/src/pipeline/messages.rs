use ndarray::Array2;

use crate::frame::{Frame, FrameSize};
use crate::params::{Algorithm, OutputMode};

/// Output of one capture cycle.
#[derive(Clone, Debug)]
pub struct CaptureMessage {
    pub raw: Frame,
    /// `raw` after reference subtraction and the capture filter chain.
    pub filtered: Frame,
    pub fps: f64,
    pub size: FrameSize,
}

/// Output of one reconstruction cycle, ready for display.
#[derive(Clone, Debug)]
pub struct ReconstructionMessage {
    pub image: Array2<u8>,
    pub fps: f64,
    pub algorithm: Algorithm,
    pub output_mode: OutputMode,
    /// Index of the captured frame this was computed from.
    pub frame_index: usize,
}
