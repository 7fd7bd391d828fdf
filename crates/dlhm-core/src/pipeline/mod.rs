//! Threaded capture/reconstruct pipeline.
//!
//! Two long-running workers exchange data through depth-1 [`Slot`]s. A
//! publish into an occupied slot is dropped, so a slow consumer stalls its
//! producer instead of building a queue. The display side is driven by the
//! caller through [`DisplayDriver::tick`].

pub mod capture;
pub mod channels;
pub mod display;
pub mod messages;
pub mod reconstruct;
pub mod slot;
pub mod state;
pub mod telemetry;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::{DlhmError, Result};
use crate::io::image_io::load_image;
use crate::params::ParameterEditor;
use crate::source::open_source;

pub use capture::CaptureWorker;
pub use channels::PipelineChannels;
pub use display::{DisplayDriver, DisplayUpdate};
pub use messages::{CaptureMessage, ReconstructionMessage};
pub use reconstruct::ReconstructWorker;
pub use slot::Slot;
pub use state::{WorkerMonitor, WorkerState};
pub use telemetry::FpsMeter;

/// Running capture and reconstruct threads.
///
/// Dropping the handle raises the stop flag and joins both threads.
pub struct Pipeline {
    channels: Arc<PipelineChannels>,
    stop: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
    capture_monitor: Arc<WorkerMonitor>,
    reconstruct_monitor: Arc<WorkerMonitor>,
}

impl Pipeline {
    /// Open the source and spawn both workers. A source that cannot be
    /// opened aborts startup with [`DlhmError::SourceUnavailable`].
    pub fn start(config: &SessionConfig) -> Result<Self> {
        config.parameters.validate()?;
        let source = open_source(&config.source.kind)?;
        let reference = match &config.source.reference {
            Some(path) => Some(load_image(path).map_err(|e| {
                DlhmError::Config(format!("reference frame {}: {e}", path.display()))
            })?),
            None => None,
        };

        let channels = Arc::new(PipelineChannels::new());
        let stop = Arc::new(AtomicBool::new(false));
        let capture_monitor = Arc::new(WorkerMonitor::new());
        let reconstruct_monitor = Arc::new(WorkerMonitor::new());

        let capture = CaptureWorker::new(
            source,
            config.source.mirror,
            reference,
            Arc::clone(&channels),
            Arc::clone(&capture_monitor),
        );
        let reconstruct =
            ReconstructWorker::new(Arc::clone(&channels), Arc::clone(&reconstruct_monitor));

        let mut workers = Vec::with_capacity(2);
        let capture_stop = Arc::clone(&stop);
        workers.push(
            std::thread::Builder::new()
                .name("dlhm-capture".into())
                .spawn(move || capture.run(capture_stop))?,
        );
        let reconstruct_stop = Arc::clone(&stop);
        let spawned = std::thread::Builder::new()
            .name("dlhm-reconstruct".into())
            .spawn(move || reconstruct.run(reconstruct_stop));
        match spawned {
            Ok(handle) => workers.push(handle),
            Err(e) => {
                stop.store(true, Ordering::Relaxed);
                for handle in workers {
                    let _ = handle.join();
                }
                return Err(e.into());
            }
        }

        info!(source = %config.source.kind, "Pipeline started");
        Ok(Self {
            channels,
            stop,
            workers,
            capture_monitor,
            reconstruct_monitor,
        })
    }

    pub fn channels(&self) -> &Arc<PipelineChannels> {
        &self.channels
    }

    /// A display driver seeded from `config`.
    pub fn display(&self, config: &SessionConfig) -> DisplayDriver {
        let mut editor = ParameterEditor::new(config.parameters.clone());
        editor.set_fix_r(config.display.fix_r);
        DisplayDriver::new(
            Arc::clone(&self.channels),
            editor,
            config.capture_filters.clone(),
            config.reconstruction_filters.clone(),
        )
    }

    pub fn capture_monitor(&self) -> &WorkerMonitor {
        &self.capture_monitor
    }

    pub fn reconstruct_monitor(&self) -> &WorkerMonitor {
        &self.reconstruct_monitor
    }

    /// Stop both workers and wait for them.
    pub fn shutdown(mut self) {
        self.join_workers();
    }

    fn join_workers(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("Pipeline worker panicked");
            }
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.join_workers();
    }
}
