use std::time::{Duration, Instant};

/// Frames per second of one processing cycle, rounded to 0.1.
///
/// Only the span between [`FpsMeter::start`] and [`FpsMeter::stop`] counts,
/// so idle polling does not drag the figure down.
#[derive(Debug, Default)]
pub struct FpsMeter {
    started: Option<Instant>,
    last: f64,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Close the current cycle and return its rate. Without a matching
    /// `start` the previous value is returned.
    pub fn stop(&mut self) -> f64 {
        if let Some(started) = self.started.take() {
            self.last = fps_from_duration(started.elapsed());
        }
        self.last
    }

    pub fn last(&self) -> f64 {
        self.last
    }
}

/// `1 / elapsed` rounded to one decimal. A zero duration reports 0.
pub fn fps_from_duration(elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    (10.0 / secs).round() / 10.0
}
