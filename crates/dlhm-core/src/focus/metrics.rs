use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::{DEFAULT_ACUTANCE_SIGMA, PARALLEL_PIXEL_THRESHOLD};
use crate::filters::gaussian::gaussian_gradient_magnitude;

/// Population variance of all samples.
pub fn metric_variance(data: &Array2<f32>) -> f64 {
    let n = data.len();
    if n == 0 {
        return 0.0;
    }
    let mean = data.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    data.iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64
}

/// Mean Gaussian gradient magnitude at [`DEFAULT_ACUTANCE_SIGMA`].
pub fn metric_acutance(data: &Array2<f32>) -> f64 {
    metric_acutance_sigma(data, DEFAULT_ACUTANCE_SIGMA)
}

pub fn metric_acutance_sigma(data: &Array2<f32>, sigma: f32) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let grad = gaussian_gradient_magnitude(data, sigma);
    grad.iter().map(|&v| v as f64).sum::<f64>() / grad.len() as f64
}

/// Local variance over a `window × window` neighbourhood, borders clamped.
///
/// Bright regions of the map mark in-focus structure; it is the per-pixel
/// counterpart of [`metric_variance`].
pub fn focus_variance_map(data: &Array2<f32>, window: usize) -> Array2<f32> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return Array2::zeros((h, w));
    }
    let radius = (window.max(1) / 2) as isize;

    let row_values = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f64;
                let mut sum_sq = 0.0f64;
                let mut count = 0.0f64;
                for dr in -radius..=radius {
                    let r = (row as isize + dr).clamp(0, h as isize - 1) as usize;
                    for dc in -radius..=radius {
                        let c = (col as isize + dc).clamp(0, w as isize - 1) as usize;
                        let v = data[[r, c]] as f64;
                        sum += v;
                        sum_sq += v * v;
                        count += 1.0;
                    }
                }
                let mean = sum / count;
                (sum_sq / count - mean * mean).max(0.0) as f32
            })
            .collect()
    };

    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(row_values).collect()
    } else {
        (0..h).map(row_values).collect()
    };

    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((h, w), flat).unwrap_or_else(|_| Array2::zeros((h, w)))
}
