use std::path::PathBuf;
use std::sync::Arc;

use crate::filters::FilterStep;
use crate::frame::Frame;
use crate::optics::apodization::ApodizationMask;
use crate::params::ReconstructionParameters;

use super::messages::{CaptureMessage, ReconstructionMessage};
use super::slot::Slot;

/// Every mailbox connecting the display loop and the two workers.
///
/// Data slots flow capture → display → reconstruct → display. Parameter
/// slots are filled by the display loop whenever they have been drained.
#[derive(Debug, Default)]
pub struct PipelineChannels {
    pub capture_out: Slot<CaptureMessage>,
    pub reconstruct_in: Slot<Frame>,
    pub reconstruct_out: Slot<ReconstructionMessage>,

    pub parameters: Slot<ReconstructionParameters>,
    pub mask: Slot<Arc<ApodizationMask>>,
    pub capture_filters: Slot<Vec<FilterStep>>,
    pub reconstruction_filters: Slot<Vec<FilterStep>>,
    /// Request to switch the capture source to a still image.
    pub static_path: Slot<PathBuf>,
}

impl PipelineChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reconstruct worker's readiness gate: a frame plus a full parameter
    /// bundle.
    pub fn reconstruction_ready(&self) -> bool {
        self.reconstruct_in.is_occupied()
            && self.parameters.is_occupied()
            && self.mask.is_occupied()
            && self.reconstruction_filters.is_occupied()
    }
}
