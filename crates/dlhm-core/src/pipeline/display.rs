use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::filters::FilterStep;
use crate::frame::FrameSize;
use crate::optics::apodization::MaskCache;
use crate::params::ParameterEditor;

use super::channels::PipelineChannels;
use super::messages::{CaptureMessage, ReconstructionMessage};

/// Messages collected by one display tick.
#[derive(Debug, Default)]
pub struct DisplayUpdate {
    pub capture: Option<CaptureMessage>,
    pub reconstruction: Option<ReconstructionMessage>,
}

/// Headless stand-in for the interactive front end.
///
/// Each tick it drains the workers' outputs, forwards the fresh capture to
/// the reconstruct worker and refills every drained parameter slot. The
/// apodization mask is rebuilt here, off the workers, when the frame size or
/// cosine period changes.
pub struct DisplayDriver {
    channels: Arc<PipelineChannels>,
    editor: ParameterEditor,
    capture_filters: Vec<FilterStep>,
    reconstruction_filters: Vec<FilterStep>,
    masks: MaskCache,
    frame_size: Option<FrameSize>,
}

impl DisplayDriver {
    pub fn new(
        channels: Arc<PipelineChannels>,
        editor: ParameterEditor,
        capture_filters: Vec<FilterStep>,
        reconstruction_filters: Vec<FilterStep>,
    ) -> Self {
        Self {
            channels,
            editor,
            capture_filters,
            reconstruction_filters,
            masks: MaskCache::new(),
            frame_size: None,
        }
    }

    pub fn editor(&self) -> &ParameterEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ParameterEditor {
        &mut self.editor
    }

    pub fn set_capture_filters(&mut self, steps: Vec<FilterStep>) {
        self.capture_filters = steps;
    }

    pub fn set_reconstruction_filters(&mut self, steps: Vec<FilterStep>) {
        self.reconstruction_filters = steps;
    }

    /// Ask the capture worker to switch to a still image. Returns `false`
    /// if an earlier request is still pending.
    pub fn request_static_file(&self, path: PathBuf) -> bool {
        self.channels.static_path.publish(path)
    }

    /// Size of the most recent captured frame.
    pub fn frame_size(&self) -> Option<FrameSize> {
        self.frame_size
    }

    pub fn tick(&mut self) -> DisplayUpdate {
        let capture = self.channels.capture_out.take();
        if let Some(msg) = &capture {
            if self.frame_size != Some(msg.size) {
                debug!(size = %msg.size, "Capture resolution changed");
                self.frame_size = Some(msg.size);
            }
            self.channels.reconstruct_in.publish(msg.filtered.clone());
        }

        let params = self.editor.params();
        self.channels.parameters.publish(params.clone());
        self.channels
            .capture_filters
            .publish(self.capture_filters.clone());
        self.channels
            .reconstruction_filters
            .publish(self.reconstruction_filters.clone());
        if let Some(size) = self.frame_size {
            let mask = self.masks.get(params.cosine_period, size);
            self.channels.mask.publish(mask);
        }

        DisplayUpdate {
            capture,
            reconstruction: self.channels.reconstruct_out.take(),
        }
    }
}
