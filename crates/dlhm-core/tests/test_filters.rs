mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use dlhm_core::filters::frequency::{frequency_filter_array, PassBand};
use dlhm_core::filters::gaussian::{gaussian_blur_array, gaussian_gradient_magnitude};
use dlhm_core::filters::histogram::adaptive_equalize_array;
use dlhm_core::filters::levels::{brightness_contrast, gamma_correct, normalize_to_u8};
use dlhm_core::filters::{apply_filter_chain, apply_filter_step, FilterStep};
use dlhm_core::frame::Frame;

use common::{checkerboard, ramp};

fn frame(data: Array2<f32>) -> Frame {
    Frame::new(data, 8)
}

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

#[test]
fn test_gamma_identity() {
    let f = frame(ramp(4, 9));
    let out = gamma_correct(&f, 1.0, 1.0);
    for (a, b) in f.data.iter().zip(out.data.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
    }
}

#[test]
fn test_gamma_brightens_midtones_and_gain_clamps() {
    let f = frame(Array2::from_elem((2, 2), 0.25));
    let out = gamma_correct(&f, 0.5, 1.0);
    assert_abs_diff_eq!(out.data[[0, 0]], 0.5, epsilon = 1e-6);
    let boosted = gamma_correct(&f, 1.0, 10.0);
    assert!(boosted.data.iter().all(|&v| v == 1.0));
}

#[test]
fn test_contrast_around_midpoint() {
    let f = frame(Array2::from_shape_vec((1, 3), vec![0.25, 0.5, 0.75]).unwrap());
    let out = brightness_contrast(&f, 0.0, 2.0);
    assert_eq!(out.data.as_slice().unwrap(), &[0.0, 0.5, 1.0]);
}

#[test]
fn test_normalize_to_u8_full_range() {
    let data = Array2::from_shape_vec((1, 3), vec![-2.0f64, 0.0, 2.0]).unwrap();
    let out = normalize_to_u8(&data);
    assert_eq!(out.as_slice().unwrap(), &[0, 128, 255]);
}

#[test]
fn test_normalize_to_u8_constant_is_black() {
    let data = Array2::from_elem((3, 3), 7.0f32);
    assert!(normalize_to_u8(&data).iter().all(|&v| v == 0));
}

// ---------------------------------------------------------------------------
// Adaptive equalization
// ---------------------------------------------------------------------------

#[test]
fn test_equalization_spreads_narrow_histogram() {
    let data = Array2::from_shape_fn((32, 32), |(r, c)| 0.45 + 0.1 * ((r + c) % 8) as f32 / 7.0);
    let out = adaptive_equalize_array(&data, 2, 0.0);
    let min = out.iter().cloned().fold(f32::MAX, f32::min);
    let max = out.iter().cloned().fold(f32::MIN, f32::max);
    assert!(max - min > 0.5, "expected stretched range, got {min}..{max}");
    assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn test_equalization_preserves_order() {
    let data = ramp(16, 16);
    let out = adaptive_equalize_array(&data, 1, 0.0);
    for row in out.rows() {
        for pair in row.as_slice().unwrap().windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }
}

#[test]
fn test_equalization_more_tiles_than_pixels() {
    let data = ramp(5, 3);
    let out = adaptive_equalize_array(&data, 8, 0.02);
    assert_eq!(out.dim(), (5, 3));
}

// ---------------------------------------------------------------------------
// Frequency filters
// ---------------------------------------------------------------------------

#[test]
fn test_low_pass_removes_checkerboard() {
    let tau = std::f32::consts::TAU;
    let data = Array2::from_shape_fn((32, 32), |(r, c)| {
        let wave = 0.25 * (tau * 2.0 * c as f32 / 32.0).cos();
        let checker = if (r + c) % 2 == 0 { 0.2 } else { -0.2 };
        0.5 + wave + checker
    });
    let out = frequency_filter_array(&data, 0.3, PassBand::Low);
    for ((_, c), &v) in out.indexed_iter() {
        let expected = 0.5 + 0.5 * (tau * 2.0 * c as f32 / 32.0).cos();
        assert_abs_diff_eq!(v, expected, epsilon = 1e-4);
    }
}

#[test]
fn test_high_pass_highlights_edges() {
    let data = Array2::from_shape_fn((32, 32), |(_, c)| if c < 16 { 0.0 } else { 1.0 });
    let out = frequency_filter_array(&data, 0.3, PassBand::High);
    let max = out.iter().cloned().fold(f32::MIN, f32::max);
    assert_abs_diff_eq!(max, 1.0, epsilon = 1e-6);
    assert!(
        out[[16, 16]] > 2.0 * out[[16, 8]],
        "edge {} should dominate interior {}",
        out[[16, 16]],
        out[[16, 8]]
    );
}

#[test]
fn test_full_low_pass_is_rescaled_identity() {
    let data = ramp(8, 8);
    let out = frequency_filter_array(&data, 2.0, PassBand::Low);
    for (a, b) in data.iter().zip(out.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-5);
    }
}

// ---------------------------------------------------------------------------
// Gaussian
// ---------------------------------------------------------------------------

#[test]
fn test_blur_preserves_constant() {
    let data = Array2::from_elem((10, 12), 0.3f32);
    let out = gaussian_blur_array(&data, 1.5);
    assert!(out.iter().all(|&v| (v - 0.3).abs() < 1e-5));
}

#[test]
fn test_gradient_of_ramp_is_slope() {
    let data = Array2::from_shape_fn((20, 20), |(_, c)| c as f32 * 0.01);
    let g = gaussian_gradient_magnitude(&data, 1.0);
    // Away from the clamped borders the slope is recovered.
    assert_abs_diff_eq!(g[[10, 10]], 0.01, epsilon = 5e-4);
    assert!(g[[10, 10]] > g[[10, 0]]);
}

// ---------------------------------------------------------------------------
// Filter chain
// ---------------------------------------------------------------------------

#[test]
fn test_empty_chain_is_identity() {
    let f = frame(ramp(4, 4));
    let out = apply_filter_chain(&f, &[]);
    assert_eq!(out.data, f.data);
}

#[test]
fn test_chain_applies_in_order() {
    let f = frame(Array2::from_elem((2, 2), 0.25));
    let steps = [
        FilterStep::Gamma {
            gamma: 0.5,
            gain: 1.0,
        },
        FilterStep::Contrast {
            brightness: 0.1,
            contrast: 1.0,
        },
    ];
    let out = apply_filter_chain(&f, &steps);
    assert_abs_diff_eq!(out.data[[0, 0]], 0.6, epsilon = 1e-6);

    let reversed: Vec<FilterStep> = steps.iter().rev().cloned().collect();
    let out = apply_filter_chain(&f, &reversed);
    assert_abs_diff_eq!(out.data[[0, 0]], 0.35f32.sqrt(), epsilon = 1e-6);
}

#[test]
fn test_chain_keeps_metadata() {
    let mut f = frame(ramp(4, 4));
    f.metadata.frame_index = 42;
    let out = apply_filter_chain(&f, &[FilterStep::HighPass { cutoff: 0.1 }]);
    assert_eq!(out.metadata.frame_index, 42);
}

#[test]
fn test_single_step_dispatch() {
    let f = frame(checkerboard(16, 16, 2));
    let out = apply_filter_step(
        &f,
        &FilterStep::AdaptiveEqualization {
            tiles: 2,
            clip_limit: 0.01,
        },
    );
    assert_eq!(out.data.dim(), (16, 16));
    let lp = apply_filter_step(&f, &FilterStep::LowPass { cutoff: 0.5 });
    assert_eq!(lp.data.dim(), (16, 16));
}

#[test]
fn test_filter_step_display() {
    assert_eq!(
        format!("{}", FilterStep::HighPass { cutoff: 0.2 }),
        "High Pass (0.2)"
    );
    assert_eq!(
        format!(
            "{}",
            FilterStep::AdaptiveEqualization {
                tiles: 8,
                clip_limit: 0.02
            }
        ),
        "Adaptive Equalization (8 tiles, clip 0.02)"
    );
}
