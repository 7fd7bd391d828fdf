use ndarray::{Array2, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Gaussian blur of a raw array using separable 1D convolution with
/// clamped borders.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    let kernel = gaussian_kernel(sigma);
    let row_pass = convolve_axis(data, &kernel, Axis(1));
    convolve_axis(&row_pass, &kernel, Axis(0))
}

/// Magnitude of the Gaussian-smoothed gradient,
/// `sqrt((∂G/∂x * I)² + (∂G/∂y * I)²)`.
pub fn gaussian_gradient_magnitude(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    let smooth = gaussian_kernel(sigma);
    let deriv = gaussian_derivative_kernel(sigma);

    let gx = convolve_axis(&convolve_axis(data, &deriv, Axis(1)), &smooth, Axis(0));
    let gy = convolve_axis(&convolve_axis(data, &smooth, Axis(1)), &deriv, Axis(0));

    ndarray::Zip::from(&gx)
        .and(&gy)
        .map_collect(|&a, &b| (a * a + b * b).sqrt())
}

fn kernel_radius(sigma: f32) -> usize {
    (sigma.max(1e-3) * 4.0).ceil() as usize
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let sigma = sigma.max(1e-3);
    let radius = kernel_radius(sigma);
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / s2).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// First derivative of the normalized Gaussian, `-x/σ² · G(x)`.
fn gaussian_derivative_kernel(sigma: f32) -> Vec<f32> {
    let sigma = sigma.max(1e-3);
    let radius = kernel_radius(sigma);
    let base = gaussian_kernel(sigma);
    base.iter()
        .enumerate()
        .map(|(i, &g)| {
            let x = i as f32 - radius as f32;
            -x / (sigma * sigma) * g
        })
        .collect()
}

/// Convolve every lane along `axis` with `kernel` (odd length, centred),
/// clamping indices at the borders. `Axis(1)` filters along rows.
fn convolve_axis(data: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;
    let lane_len = data.len_of(axis) as isize;

    let filter_lane = |lane: ndarray::ArrayView1<f32>| -> Vec<f32> {
        (0..lane_len)
            .map(|i| {
                kernel
                    .iter()
                    .enumerate()
                    .map(|(ki, &kv)| {
                        // Kernel index runs backwards: true convolution.
                        let src = (i + radius as isize - ki as isize).clamp(0, lane_len - 1);
                        lane[src as usize] * kv
                    })
                    .sum()
            })
            .collect()
    };

    let other = if axis == Axis(1) { Axis(0) } else { Axis(1) };
    let lanes: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        data.axis_iter(other).into_par_iter().map(filter_lane).collect()
    } else {
        data.axis_iter(other).map(filter_lane).collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    for (i, lane) in lanes.into_iter().enumerate() {
        for (j, v) in lane.into_iter().enumerate() {
            if axis == Axis(1) {
                result[[i, j]] = v;
            } else {
                result[[j, i]] = v;
            }
        }
    }
    result
}
