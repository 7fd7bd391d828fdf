use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::consts::WORKER_IDLE_POLL_MS;
use crate::error::DlhmError;
use crate::filters::{apply_filter_chain, FilterStep};
use crate::frame::Frame;
use crate::source::{FrameSource, StillImageSource};

use super::channels::PipelineChannels;
use super::messages::CaptureMessage;
use super::state::{WorkerMonitor, WorkerState};
use super::telemetry::FpsMeter;

/// Owns the frame source and feeds `capture_out`.
pub struct CaptureWorker {
    source: Box<dyn FrameSource>,
    mirror: bool,
    reference: Option<Frame>,
    filters: Vec<FilterStep>,
    meter: FpsMeter,
    /// Consecutive acquisition failures since the last good frame.
    failing: usize,
    channels: Arc<PipelineChannels>,
    monitor: Arc<WorkerMonitor>,
}

impl CaptureWorker {
    pub fn new(
        source: Box<dyn FrameSource>,
        mirror: bool,
        reference: Option<Frame>,
        channels: Arc<PipelineChannels>,
        monitor: Arc<WorkerMonitor>,
    ) -> Self {
        Self {
            source,
            mirror,
            reference,
            filters: Vec::new(),
            meter: FpsMeter::new(),
            failing: 0,
            channels,
            monitor,
        }
    }

    pub fn run(mut self, stop: Arc<AtomicBool>) {
        info!(resolution = %self.source.resolution(), "Capture worker started");
        while !stop.load(Ordering::Relaxed) {
            if !self.cycle() {
                self.monitor.enter(WorkerState::Idle);
                std::thread::sleep(Duration::from_millis(WORKER_IDLE_POLL_MS));
            }
        }
        info!(cycles = self.monitor.cycles(), "Capture worker stopped");
    }

    /// Acquire, process and try to publish one frame. Returns whether the
    /// message reached the output slot.
    pub fn cycle(&mut self) -> bool {
        self.poll_requests();

        self.monitor.enter(WorkerState::AcquireOrCompute);
        self.meter.start();
        let frame = match self.source.next_frame() {
            Ok(f) => f,
            Err(e) => {
                self.acquisition_failed(&e);
                return false;
            }
        };
        if self.failing > 0 {
            info!(failures = self.failing, "Frame acquisition recovered");
            self.failing = 0;
        }
        let raw = if self.mirror { frame.mirrored() } else { frame };
        let corrected = match &self.reference {
            Some(reference) => raw.subtract_reference(reference),
            None => raw.clone(),
        };
        let filtered = apply_filter_chain(&corrected, &self.filters);
        let fps = self.meter.stop();

        self.monitor.enter(WorkerState::Publish);
        let size = raw.size();
        let published = self.channels.capture_out.publish(CaptureMessage {
            raw,
            filtered,
            fps,
            size,
        });
        self.monitor.record(published);
        published
    }

    /// Warn once per outage; repeats go to debug until a frame arrives.
    fn acquisition_failed(&mut self, error: &DlhmError) {
        if self.failing == 0 {
            warn!(error = %error, "Frame acquisition failed");
        } else {
            debug!(error = %error, failures = self.failing + 1, "Frame acquisition still failing");
        }
        self.failing += 1;
        self.monitor.record_failure();
    }

    fn poll_requests(&mut self) {
        if let Some(filters) = self.channels.capture_filters.take() {
            if filters != self.filters {
                debug!(steps = filters.len(), "Capture filter chain updated");
            }
            self.filters = filters;
        }
        if let Some(path) = self.channels.static_path.take() {
            match StillImageSource::open(&path) {
                Ok(source) => {
                    info!(
                        path = %path.display(),
                        resolution = %source.resolution(),
                        "Switched capture to still image"
                    );
                    self.source = Box::new(source);
                }
                Err(e) => warn!(error = %e, "Ignoring still image request"),
            }
        }
    }
}
