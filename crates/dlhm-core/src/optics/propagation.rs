//! Angular-spectrum propagation.
//!
//! The field is taken to the centered spatial-frequency domain, multiplied by
//! the free-space transfer function
//!
//! ```text
//! H(fx, fy) = exp(i · z · s · 2π · sqrt(λ⁻² − fx² − fy²))
//! ```
//!
//! and brought back. `s` is the optical magnification applied to the
//! propagation distance. The square root is taken in complex arithmetic, so
//! frequencies past the cutoff `fx² + fy² > λ⁻²` become evanescent and decay
//! as `exp(−2π·|z·s|·sqrt(fx² + fy² − λ⁻²))` in either propagation direction.

use ndarray::Array2;
use num_complex::Complex;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::frame::ComplexField;

use super::fft::{fft2_centered, ifft2_centered};

/// Propagate `field` by the signed distance `z` with unit magnification.
pub fn propagate(field: &ComplexField, z: f64, wavelength: f64, dx: f64, dy: f64) -> ComplexField {
    propagate_scaled(field, z, wavelength, dx, dy, 1.0)
}

/// Propagate `field` by `z · scale_factor`.
///
/// All lengths share one unit (micrometres throughout this crate).
pub fn propagate_scaled(
    field: &ComplexField,
    z: f64,
    wavelength: f64,
    dx: f64,
    dy: f64,
    scale_factor: f64,
) -> ComplexField {
    let (h, w) = field.dim();
    if h == 0 || w == 0 {
        return field.clone();
    }

    let mut spectrum = fft2_centered(field);
    let kernel = transfer_function(h, w, z * scale_factor, wavelength, dx, dy);
    spectrum *= &kernel;
    ifft2_centered(&spectrum)
}

/// Sample the transfer function on the centered frequency grid of an
/// `h × w` field: `fx = (col − w/2)/(dx·w)`, `fy = (row − h/2)/(dy·h)`.
pub fn transfer_function(
    h: usize,
    w: usize,
    z: f64,
    wavelength: f64,
    dx: f64,
    dy: f64,
) -> ComplexField {
    let dfx = 1.0 / (dx * w as f64);
    let dfy = 1.0 / (dy * h as f64);
    let inv_lambda_sq = 1.0 / (wavelength * wavelength);
    let two_pi_z = std::f64::consts::TAU * z;

    let value = |row: usize, col: usize| -> Complex<f64> {
        let fx = (col as f64 - (w / 2) as f64) * dfx;
        let fy = (row as f64 - (h / 2) as f64) * dfy;
        let kz = longitudinal_frequency(inv_lambda_sq - fx * fx - fy * fy, z);
        (Complex::i() * two_pi_z * kz).exp()
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<Complex<f64>>> = (0..h)
            .into_par_iter()
            .map(|row| (0..w).map(|col| value(row, col)).collect())
            .collect();
        let flat: Vec<Complex<f64>> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((h, w), flat).unwrap_or_else(|_| Array2::zeros((h, w)))
    } else {
        Array2::from_shape_fn((h, w), |(row, col)| value(row, col))
    }
}

/// Complex square root of `arg` choosing the branch whose imaginary part has
/// the sign of `z`, so that `exp(i·2π·z·kz)` never grows.
fn longitudinal_frequency(arg: f64, z: f64) -> Complex<f64> {
    let kz = Complex::new(arg, 0.0).sqrt();
    if z < 0.0 {
        kz.conj()
    } else {
        kz
    }
}

/// Position `(row, col)` of the brightest sample of a field.
pub fn intensity_peak(field: &ComplexField) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_val = f64::NEG_INFINITY;
    for ((row, col), v) in field.indexed_iter() {
        let val = v.norm_sqr();
        if val > best_val {
            best_val = val;
            best = (row, col);
        }
    }
    best
}
