mod common;

use std::cell::Cell;

use approx::assert_abs_diff_eq;
use ndarray::Array2;
use num_complex::Complex;

use dlhm_core::filters::gaussian::gaussian_blur_array;
use dlhm_core::focus::{
    focus_sweep, focus_variance_map, metric_acutance, metric_variance, FocusMetric, SweepOptics,
    SweepRange,
};
use dlhm_core::optics::propagation::propagate;

use common::checkerboard;

const WAVELENGTH: f64 = 0.5;
const PITCH: f64 = 1.0;

/// Amplitude object (a dark square) defocused by `z`.
fn defocused_object(z: f64) -> Array2<Complex<f64>> {
    let object = Array2::from_shape_fn((64, 64), |(r, c)| {
        let inside = (24..40).contains(&r) && (24..40).contains(&c);
        Complex::new(if inside { 0.2 } else { 1.0 }, 0.0)
    });
    propagate(&object, z, WAVELENGTH, PITCH, PITCH)
}

fn optics() -> SweepOptics {
    SweepOptics {
        wavelength: WAVELENGTH,
        dx: PITCH,
        dy: PITCH,
        scale_factor: 1.0,
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[test]
fn test_variance_of_constant_is_zero() {
    assert_eq!(metric_variance(&Array2::from_elem((5, 5), 0.7)), 0.0);
}

#[test]
fn test_variance_of_two_levels() {
    let data = checkerboard(8, 8, 1);
    assert_abs_diff_eq!(metric_variance(&data), 0.09, epsilon = 1e-6);
}

#[test]
fn test_acutance_higher_for_sharper_pattern() {
    let sharp = checkerboard(32, 32, 8);
    let blurred = gaussian_blur_array(&sharp, 2.0);
    assert!(metric_acutance(&sharp) > metric_acutance(&blurred));
    assert!(metric_acutance(&Array2::from_elem((8, 8), 0.5)) < 1e-6);
}

#[test]
fn test_variance_map_marks_edges() {
    let data = Array2::from_shape_fn((16, 16), |(_, c)| if c < 8 { 0.0 } else { 1.0 });
    let map = focus_variance_map(&data, 3);
    assert_eq!(map.dim(), (16, 16));
    assert_eq!(map[[5, 2]], 0.0);
    assert!(map[[5, 7]] > 0.2 && map[[5, 8]] > 0.2);
}

// ---------------------------------------------------------------------------
// Sweep
// ---------------------------------------------------------------------------

#[test]
fn test_sweep_range_distances() {
    let range = SweepRange {
        z_min: -10.0,
        z_max: 10.0,
        steps: 5,
    };
    assert_eq!(range.distances(), vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
    let single = SweepRange {
        z_min: 3.0,
        z_max: 9.0,
        steps: 1,
    };
    assert_eq!(single.distances(), vec![3.0]);
}

#[test]
fn test_sweep_rejects_zero_steps() {
    let field = defocused_object(0.0);
    let range = SweepRange {
        z_min: 0.0,
        z_max: 1.0,
        steps: 0,
    };
    assert!(focus_sweep(&field, &range, &optics(), FocusMetric::Variance, None).is_err());
}

#[test]
fn test_sweep_reports_progress_and_curve() {
    let field = defocused_object(40.0);
    let range = SweepRange {
        z_min: -80.0,
        z_max: 0.0,
        steps: 9,
    };
    let calls = Cell::new(0usize);
    let progress = |n: usize| calls.set(n);
    let sweep = focus_sweep(
        &field,
        &range,
        &optics(),
        FocusMetric::Combined,
        Some(&progress),
    )
    .unwrap();

    assert_eq!(calls.get(), 9);
    assert_eq!(sweep.curve.len(), 9);
    assert_eq!(sweep.curve[sweep.best_index].0, sweep.best_z);
    let best = sweep.curve[sweep.best_index].1;
    assert!(sweep.curve.iter().all(|&(_, v)| v >= best));
    assert_eq!(sweep.field.dim(), (64, 64));
}

#[test]
fn test_sweep_best_field_matches_direct_propagation() {
    let field = defocused_object(20.0);
    let range = SweepRange {
        z_min: -30.0,
        z_max: -10.0,
        steps: 3,
    };
    let sweep = focus_sweep(&field, &range, &optics(), FocusMetric::Acutance, None).unwrap();
    let direct = propagate(&field, sweep.best_z, WAVELENGTH, PITCH, PITCH);
    let diff = sweep
        .field
        .iter()
        .zip(direct.iter())
        .map(|(a, b)| (a - b).norm())
        .fold(0.0, f64::max);
    assert!(diff < 1e-12);
}

#[test]
fn test_focus_metric_display() {
    assert_eq!(format!("{}", FocusMetric::Combined), "Combined");
    assert_eq!(FocusMetric::default(), FocusMetric::Variance);
}
