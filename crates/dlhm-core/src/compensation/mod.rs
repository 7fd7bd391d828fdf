//! Semi-heuristic phase compensation of off-axis holograms.
//!
//! The sideband picked by the spectral filter gives a first guess of the
//! carrier frequency. The inverse transform of the isolated sideband still
//! carries a linear phase tilt from the reference angle; a shrinking local
//! grid search refines the carrier until the binarized phase stops improving.

pub mod metric;
pub mod search;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::{DEFAULT_SEARCH_DEPTH, DEFAULT_SEARCH_STEP};
use crate::optics::fft::ifft2_centered;
use crate::optics::spectral::{filter_sideband, Quadrant};

pub use metric::{compensation_metric, TiltGeometry};
pub use search::{search_tilt, CompensationResult};

/// Settings for the off-axis compensation search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationConfig {
    pub region: Quadrant,
    /// Grid spacing in spectrum pixels.
    pub step: f64,
    /// Initial grid half-width, in steps.
    pub depth: usize,
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self {
            region: Quadrant::First,
            step: DEFAULT_SEARCH_STEP,
            depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

/// Filter the sideband of `hologram`, bring it back to the object plane and
/// remove the residual reference tilt.
pub fn compensate(
    hologram: &Array2<f32>,
    geometry: &TiltGeometry,
    config: &CompensationConfig,
) -> CompensationResult {
    let sideband = filter_sideband(hologram, config.region);
    let holo_rec = ifft2_centered(&sideband.spectrum);
    let fx_max = sideband.peak.col as f64;
    let fy_max = sideband.peak.row as f64;

    let result = search_tilt(
        &holo_rec,
        fx_max,
        fy_max,
        geometry,
        config.step,
        config.depth,
    );

    info!(
        region = %config.region,
        fx_max,
        fy_max,
        fx = result.fx,
        fy = result.fy,
        score = result.score,
        iterations = result.iterations,
        "Phase compensation finished"
    );

    result
}
