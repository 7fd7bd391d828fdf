/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default illumination wavelength in micrometres.
pub const DEFAULT_WAVELENGTH_UM: f64 = 0.532;

/// Default sensor pixel pitch in micrometres.
pub const DEFAULT_PIXEL_PITCH_UM: f64 = 1.85;

/// Default source-to-sensor distance L in micrometres.
pub const DEFAULT_L_UM: f64 = 10_000.0;

/// Default source-to-sample distance Z in micrometres.
pub const DEFAULT_Z_UM: f64 = 5_000.0;

/// Default period of the raised-cosine apodization window.
pub const DEFAULT_COSINE_PERIOD: f64 = 2.0;

/// Requested capture resolution for live sources.
pub const DEFAULT_CAPTURE_WIDTH: u32 = 800;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 600;

/// Fraction of each axis excluded around the spectrum centre lines so the
/// sideband search never lands on the zero-order term.
pub const SIDEBAND_MARGIN_FRACTION: f64 = 0.1;

/// Binarization threshold applied to the normalized compensated phase.
pub const PHASE_BINARIZE_THRESHOLD: f64 = 0.1;

/// Default grid spacing (in spectrum pixels) of the compensation search.
pub const DEFAULT_SEARCH_STEP: f64 = 0.5;

/// Default initial half-width (in steps) of the compensation search grid.
pub const DEFAULT_SEARCH_DEPTH: usize = 3;

/// Display loop polling interval in milliseconds.
pub const DEFAULT_DISPLAY_TICK_MS: u64 = 20;

/// Gaussian sigma for the acutance focus metric.
pub const DEFAULT_ACUTANCE_SIGMA: f32 = 1.0;

/// Number of histogram bins used by adaptive equalization.
pub const EQUALIZATION_BINS: usize = 256;

/// Sleep between empty polls of a worker's input slots.
pub const WORKER_IDLE_POLL_MS: u64 = 1;
