use rayon::prelude::*;
use tracing::debug;

use crate::frame::ComplexField;

use super::metric::{compensation_metric, TiltGeometry};

/// Outcome of the coarse-to-fine tilt search.
#[derive(Clone, Debug)]
pub struct CompensationResult {
    /// Refined carrier column.
    pub fx: f64,
    /// Refined carrier row.
    pub fy: f64,
    pub score: usize,
    /// Score at the starting carrier position.
    pub initial_score: usize,
    pub iterations: usize,
    pub theta_x: f64,
    pub theta_y: f64,
    pub field: ComplexField,
}

/// Hill-climb the binarized-phase metric from `(fx_max, fy_max)`.
///
/// Each iteration scores a `(2g+1)²` grid of spacing `step` around the
/// current centre, rows outer, and moves to its arg-max (first maximum wins).
/// `g` starts at `depth` and shrinks by one per iteration, never below zero.
/// The search stops once the arg-max is the centre itself, which always
/// happens by the time the grid has collapsed to a single point.
pub fn search_tilt(
    holo_rec: &ComplexField,
    fx_max: f64,
    fy_max: f64,
    geometry: &TiltGeometry,
    step: f64,
    depth: usize,
) -> CompensationResult {
    let mut fx = fx_max;
    let mut fy = fy_max;
    let initial_score = compensation_metric(holo_rec, geometry, fx, fy);
    let mut half_width = depth;
    let mut iterations = 0;

    let score = loop {
        iterations += 1;
        let g = half_width as i64;
        let offsets: Vec<(i64, i64)> = (-g..=g)
            .flat_map(|j| (-g..=g).map(move |i| (i, j)))
            .collect();

        let scores: Vec<usize> = offsets
            .par_iter()
            .map(|&(i, j)| {
                compensation_metric(
                    holo_rec,
                    geometry,
                    fx + i as f64 * step,
                    fy + j as f64 * step,
                )
            })
            .collect();

        let mut best_idx = 0;
        for (idx, &s) in scores.iter().enumerate() {
            if s > scores[best_idx] {
                best_idx = idx;
            }
        }
        let (bi, bj) = offsets[best_idx];
        let best = scores[best_idx];
        fx += bi as f64 * step;
        fy += bj as f64 * step;

        debug!(iteration = iterations, half_width, fx, fy, score = best, "Tilt search step");

        if bi == 0 && bj == 0 {
            break best;
        }
        half_width = half_width.saturating_sub(1);
    };

    let (rows, cols) = holo_rec.dim();
    let (theta_x, theta_y) = geometry.angles(fx, fy, rows, cols);
    let field = geometry.compensate(holo_rec, fx, fy);

    CompensationResult {
        fx,
        fy,
        score,
        initial_score,
        iterations,
        theta_x,
        theta_y,
        field,
    }
}
