use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Phase of a worker's cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    AcquireOrCompute,
    Publish,
}

impl WorkerState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::AcquireOrCompute,
            2 => Self::Publish,
            _ => Self::Idle,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::AcquireOrCompute => 1,
            Self::Publish => 2,
        }
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::AcquireOrCompute => write!(f, "Acquiring/Computing"),
            Self::Publish => write!(f, "Publishing"),
        }
    }
}

/// Lock-free counters a worker updates every cycle.
#[derive(Debug, Default)]
pub struct WorkerMonitor {
    state: AtomicU8,
    cycles: AtomicUsize,
    published: AtomicUsize,
    dropped: AtomicUsize,
    failures: AtomicUsize,
}

impl WorkerMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Relaxed))
    }

    pub(crate) fn enter(&self, state: WorkerState) {
        self.state.store(state.as_u8(), Ordering::Relaxed);
    }

    /// Record the outcome of a publish attempt.
    pub(crate) fn record(&self, published: bool) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        if published {
            self.published.fetch_add(1, Ordering::Relaxed);
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Completed cycles, published or not.
    pub fn cycles(&self) -> usize {
        self.cycles.load(Ordering::Relaxed)
    }

    pub fn published(&self) -> usize {
        self.published.load(Ordering::Relaxed)
    }

    /// Cycles whose result was discarded because the output slot was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Cycles that ended before publishing because the input failed.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}
