use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::consts::WORKER_IDLE_POLL_MS;
use crate::filters::apply_filter_chain;
use crate::filters::levels::normalize_to_u8;
use crate::frame::Frame;
use crate::reconstruction::{reconstruct_frame, render_output};

use super::channels::PipelineChannels;
use super::messages::ReconstructionMessage;
use super::state::{WorkerMonitor, WorkerState};
use super::telemetry::FpsMeter;

/// Turns captured frames into display images.
pub struct ReconstructWorker {
    meter: FpsMeter,
    channels: Arc<PipelineChannels>,
    monitor: Arc<WorkerMonitor>,
}

impl ReconstructWorker {
    pub fn new(channels: Arc<PipelineChannels>, monitor: Arc<WorkerMonitor>) -> Self {
        Self {
            meter: FpsMeter::new(),
            channels,
            monitor,
        }
    }

    pub fn run(mut self, stop: Arc<AtomicBool>) {
        info!("Reconstruct worker started");
        while !stop.load(Ordering::Relaxed) {
            if self.cycle().is_none() {
                self.monitor.enter(WorkerState::Idle);
                std::thread::sleep(Duration::from_millis(WORKER_IDLE_POLL_MS));
            }
        }
        info!(cycles = self.monitor.cycles(), "Reconstruct worker stopped");
    }

    /// Run one reconstruction if a frame and every parameter are waiting.
    /// `None` means the inputs were not ready; otherwise whether the result
    /// reached the output slot.
    pub fn cycle(&mut self) -> Option<bool> {
        if !self.channels.reconstruction_ready() {
            return None;
        }
        let frame = self.channels.reconstruct_in.take()?;
        let params = self.channels.parameters.take()?;
        let mask = self.channels.mask.take()?;
        let filters = self.channels.reconstruction_filters.take()?;

        self.monitor.enter(WorkerState::AcquireOrCompute);
        self.meter.start();
        let reconstruction = reconstruct_frame(&frame, &params, &mask);
        let unit = render_output(&reconstruction, params.output_mode);
        let rendered = apply_filter_chain(&Frame::new(unit, 8), &filters);
        let image = normalize_to_u8(&rendered.data);
        let fps = self.meter.stop();
        debug!(
            algorithm = %params.algorithm,
            mode = %params.output_mode,
            fps,
            "Frame reconstructed"
        );

        self.monitor.enter(WorkerState::Publish);
        let published = self.channels.reconstruct_out.publish(ReconstructionMessage {
            image,
            fps,
            algorithm: params.algorithm,
            output_mode: params.output_mode,
            frame_index: frame.metadata.frame_index,
        });
        self.monitor.record(published);
        Some(published)
    }
}
