//! Kreuzer reconstruction of in-line (lensless) holograms.
//!
//! A point source at distance `L` from the sensor illuminates the sample at
//! distance `z`. The hologram is first remapped from the flat sensor onto the
//! spherical reference surface, multiplied by the spherical phase correction
//! and a chirp that pre-compensates the discrete Fresnel kernel, then padded,
//! apodized and propagated over `L − z` with the angular-spectrum engine.

use ndarray::{s, Array2};
use num_complex::Complex;
use tracing::debug;

use crate::filters::levels::normalize;
use crate::frame::ComplexField;

use super::apodization::{fit_centered, ApodizationMask};
use super::propagation::propagate;

/// Geometry of one Kreuzer reconstruction. Lengths in micrometres.
#[derive(Clone, Copy, Debug)]
pub struct KreuzerGeometry {
    /// Source-to-sample distance.
    pub z: f64,
    /// Source-to-sensor distance.
    pub l: f64,
    pub wavelength: f64,
    /// Sensor pixel pitch.
    pub dx: f64,
    /// Pixel pitch of the reconstruction plane, usually `z·dx/L`.
    pub delta_x: f64,
}

impl KreuzerGeometry {
    pub fn new(z: f64, l: f64, wavelength: f64, dx: f64) -> Self {
        let delta_x = if l > 0.0 { z * dx / l } else { dx };
        Self {
            z,
            l,
            wavelength,
            dx,
            delta_x,
        }
    }
}

/// Reconstruct the intensity of a real hologram, normalized to `[0, 1]`.
///
/// The output always has the hologram's shape. Non-square holograms are
/// zero-padded to a centered square first and cropped back afterwards; a
/// mask whose shape differs from the padded buffer is padded or cropped to
/// fit.
pub fn kreuzer_reconstruct(
    hologram: &Array2<f64>,
    geometry: &KreuzerGeometry,
    mask: &ApodizationMask,
) -> Array2<f64> {
    let (h, w) = hologram.dim();
    if h == 0 || w == 0 {
        return Array2::zeros((h, w));
    }

    let side = h.max(w);
    let square = if h == w {
        hologram.clone()
    } else {
        debug!(height = h, width = w, side, "Padding non-square hologram for Kreuzer");
        fit_centered(hologram, side, side)
    };

    let intensity = reconstruct_square(&square, geometry, mask);

    if h == w {
        intensity
    } else {
        fit_centered(&intensity, h, w)
    }
}

fn reconstruct_square(
    hologram: &Array2<f64>,
    geometry: &KreuzerGeometry,
    mask: &ApodizationMask,
) -> Array2<f64> {
    let row = hologram.nrows();
    let n = row as f64;
    let half = n / 2.0;
    let KreuzerGeometry {
        z,
        l,
        wavelength,
        dx,
        delta_x,
    } = *geometry;
    let k = std::f64::consts::TAU / wavelength;

    // Hologram-plane origin and its projection onto the reference sphere.
    let xo = -dx * n / 2.0;
    let xop = xo * l / (l * l + xo * xo).sqrt();
    let yop = xop;
    let delta_xp = xop / -half;
    let delta_yp = delta_xp;
    let x_origin = -delta_x * half;
    let y_origin = x_origin;

    let remapped = remap_to_sphere(hologram, geometry, xop, yop);

    // Spherical phase correction, roll-off and chirp, on 1-based indices.
    let prepared = Array2::from_shape_fn((row, row), |(r, c)| {
        let xi = (c + 1) as f64;
        let yi = (r + 1) as f64;

        let px = delta_xp * xi + xop;
        let py = delta_yp * yi + yop;
        let rp = (l * l - px * px - py * py).max(f64::MIN_POSITIVE).sqrt();
        let rr_sq = delta_x * delta_x * ((xi - half).powi(2) + (yi - half).powi(2)) + z * z;

        let rolloff = (l / rp).powi(4);
        let spherical = Complex::new(0.0, -0.5 * k * (rr_sq - 2.0 * z * l) * rp / (l * l)).exp();
        let chirp_arg = k / (2.0 * l)
            * (2.0 * x_origin * xi * delta_xp
                + 2.0 * y_origin * yi * delta_yp
                + xi * xi * delta_xp * delta_x
                + yi * yi * delta_yp * delta_x);
        let chirp = Complex::new(0.0, chirp_arg).exp();

        remapped[[r, c]] * rolloff * spherical * chirp
    });

    // Pad to twice the linear size, apodize, propagate.
    let padded_side = 2 * row;
    let pad = row / 2;
    let mut padded = fit_centered(&prepared, padded_side, padded_side);
    let window = mask.fitted(padded_side, padded_side);
    padded.zip_mut_with(&window, |v, &m| *v *= m);

    let propagated = propagate(&padded, l - z, wavelength, delta_x, delta_x);

    let cropped = propagated.slice(s![pad..pad + row, pad..pad + row]);
    let intensity = cropped.mapv(|v| v.norm_sqr());
    normalize(&intensity, 1.0)
}

/// Bilinear forward remap of sensor samples onto the spherical-projection
/// grid. Each source sample spreads over the four cells around its
/// destination with complementary-area weights; contributions accumulate.
/// Destination cells are clamped into `[0, row − 2]`.
fn remap_to_sphere(
    hologram: &Array2<f64>,
    geometry: &KreuzerGeometry,
    xop: f64,
    yop: f64,
) -> ComplexField {
    let row = hologram.nrows();
    let half = row as f64 / 2.0;
    let l = geometry.l;
    let dx = geometry.dx;
    let cell = -2.0 * xop / row as f64;
    let max_idx = row.saturating_sub(2) as f64;

    let mut out = ComplexField::zeros((row, row));
    if row < 2 || cell == 0.0 {
        return out;
    }

    for ((r, c), &value) in hologram.indexed_iter() {
        let xi = (c + 1) as f64 - half;
        let yi = (r + 1) as f64 - half;
        let denom = (l * l + dx * dx * (xi * xi + yi * yi)).sqrt();
        let xp = dx * xi * l / denom;
        let yp = dx * yi * l / denom;

        let x_coord = (xp - xop) / cell;
        let y_coord = (yp - yop) / cell;
        let ix = x_coord.floor().clamp(0.0, max_idx);
        let iy = y_coord.floor().clamp(0.0, max_idx);

        let x1 = ((ix + 1.0) - x_coord).clamp(0.0, 1.0);
        let x2 = 1.0 - x1;
        let y1 = ((iy + 1.0) - y_coord).clamp(0.0, 1.0);
        let y2 = 1.0 - y1;

        let (ix, iy) = (ix as usize, iy as usize);
        out[[iy, ix]] += Complex::new(x1 * y1 * value, 0.0);
        out[[iy, ix + 1]] += Complex::new(x2 * y1 * value, 0.0);
        out[[iy + 1, ix]] += Complex::new(x1 * y2 * value, 0.0);
        out[[iy + 1, ix + 1]] += Complex::new(x2 * y2 * value, 0.0);
    }

    out
}
