use ndarray::Array2;
use num_complex::Complex;

use crate::consts::PHASE_BINARIZE_THRESHOLD;
use crate::filters::levels::normalize;
use crate::frame::ComplexField;

/// Sampling geometry shared by every metric evaluation of one search.
#[derive(Clone, Copy, Debug)]
pub struct TiltGeometry {
    pub wavelength: f64,
    pub dx: f64,
    pub dy: f64,
}

impl TiltGeometry {
    /// Tilt angles `(θx, θy)` of the reference wave for a carrier at
    /// `(fx, fy)` on an `rows × cols` spectrum. The `asin` argument is clamped
    /// so far-off candidates saturate at grazing incidence instead of NaN.
    pub fn angles(&self, fx: f64, fy: f64, rows: usize, cols: usize) -> (f64, f64) {
        let fx0 = (cols / 2) as f64;
        let fy0 = (rows / 2) as f64;
        let sx = ((fx0 - fx) * self.wavelength / (cols as f64 * self.dx)).clamp(-1.0, 1.0);
        let sy = ((fy0 - fy) * self.wavelength / (rows as f64 * self.dy)).clamp(-1.0, 1.0);
        (sx.asin(), sy.asin())
    }

    /// Plane-wave reference `exp(i·k·(sinθx·m·dx + sinθy·n·dy))` with `m`, `n`
    /// the centered pixel coordinates.
    pub fn reference_wave(&self, fx: f64, fy: f64, rows: usize, cols: usize) -> ComplexField {
        let (theta_x, theta_y) = self.angles(fx, fy, rows, cols);
        let k = std::f64::consts::TAU / self.wavelength;
        let kx = k * theta_x.sin() * self.dx;
        let ky = k * theta_y.sin() * self.dy;
        let half_cols = (cols / 2) as f64;
        let half_rows = (rows / 2) as f64;

        Array2::from_shape_fn((rows, cols), |(row, col)| {
            let m = col as f64 - half_cols;
            let n = row as f64 - half_rows;
            Complex::from_polar(1.0, kx * m + ky * n)
        })
    }

    /// `field` multiplied by the reference wave for `(fx, fy)`.
    pub fn compensate(&self, field: &ComplexField, fx: f64, fy: f64) -> ComplexField {
        let (rows, cols) = field.dim();
        field * &self.reference_wave(fx, fy, rows, cols)
    }
}

/// Number of pixels whose normalized compensated phase exceeds the
/// binarization threshold. Larger is better.
pub fn compensation_metric(field: &ComplexField, geometry: &TiltGeometry, fx: f64, fy: f64) -> usize {
    let compensated = geometry.compensate(field, fx, fy);
    binarized_phase_area(&compensated)
}

/// Count of samples above [`PHASE_BINARIZE_THRESHOLD`] once the phase of
/// `field` is normalized to `[0, 1]`.
pub fn binarized_phase_area(field: &ComplexField) -> usize {
    let phase = field.mapv(|v| v.arg());
    normalize(&phase, 1.0)
        .iter()
        .filter(|&&p| p > PHASE_BINARIZE_THRESHOLD)
        .count()
}
