pub mod metrics;
pub mod sweep;

pub use metrics::{focus_variance_map, metric_acutance, metric_variance};
pub use sweep::{focus_sweep, FocusMetric, FocusSweep, SweepOptics, SweepRange};
