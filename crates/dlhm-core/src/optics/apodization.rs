use std::sync::Arc;

use ndarray::{s, Array2};
use tracing::debug;

use crate::frame::FrameSize;

/// Raised-cosine window applied to the padded Kreuzer working buffer.
///
/// Separable in x and y, clipped to non-negative values and renormalized so
/// the largest sample is 1. Read-only once built.
#[derive(Clone, Debug)]
pub struct ApodizationMask {
    data: Array2<f64>,
    period: f64,
}

impl ApodizationMask {
    /// Build a square `size × size` mask.
    pub fn cosine(period: f64, size: usize) -> Self {
        Self::cosine_rect(period, size, size)
    }

    /// Build an `h × w` mask. Coordinates run linearly over `[-n/2, n/2]`
    /// along each axis and are scaled so the edge sits at `π/period`.
    pub fn cosine_rect(period: f64, h: usize, w: usize) -> Self {
        let wx = cosine_profile(period, w);
        let wy = cosine_profile(period, h);

        let mut data = Array2::from_shape_fn((h, w), |(row, col)| wy[row] * wx[col]);
        let max = data.iter().cloned().fold(0.0f64, f64::max);
        if max > 0.0 {
            data.mapv_inplace(|v| v / max);
        }

        Self { data, period }
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// The mask resized to `(h, w)`: zero-padded symmetrically when smaller,
    /// center-cropped when larger. Returns a copy even when shapes match so
    /// the shared mask is never mutated.
    pub fn fitted(&self, h: usize, w: usize) -> Array2<f64> {
        fit_centered(&self.data, h, w)
    }
}

fn cosine_profile(period: f64, n: usize) -> Vec<f64> {
    if n < 2 || period <= 0.0 {
        return vec![1.0; n];
    }
    let half = n as f64 / 2.0;
    let step = n as f64 / (n - 1) as f64;
    (0..n)
        .map(|i| {
            let x = -half + i as f64 * step;
            let v = (x / half * std::f64::consts::PI / period).cos().powi(2);
            v.max(0.0)
        })
        .collect()
}

/// Zero-pad or center-crop `data` to exactly `(h, w)`.
pub fn fit_centered<T: Copy + num_traits::Zero>(data: &Array2<T>, h: usize, w: usize) -> Array2<T> {
    let (sh, sw) = data.dim();
    if (sh, sw) == (h, w) {
        return data.clone();
    }

    let mut out = Array2::<T>::zeros((h, w));
    let copy_h = sh.min(h);
    let copy_w = sw.min(w);
    let src_r0 = (sh - copy_h) / 2;
    let src_c0 = (sw - copy_w) / 2;
    let dst_r0 = (h - copy_h) / 2;
    let dst_c0 = (w - copy_w) / 2;

    out.slice_mut(s![dst_r0..dst_r0 + copy_h, dst_c0..dst_c0 + copy_w])
        .assign(&data.slice(s![src_r0..src_r0 + copy_h, src_c0..src_c0 + copy_w]));
    out
}

/// Holds the current mask and rebuilds it only when the cosine period or
/// the frame size changes.
#[derive(Default)]
pub struct MaskCache {
    key: Option<(u64, FrameSize)>,
    mask: Option<Arc<ApodizationMask>>,
}

impl MaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask for a hologram of `frame` size: square, sized to the padded
    /// buffer (twice the larger side).
    pub fn get(&mut self, period: f64, frame: FrameSize) -> Arc<ApodizationMask> {
        let key = (period.to_bits(), frame);
        if let (Some(cached), Some(mask)) = (self.key, &self.mask) {
            if cached == key {
                return Arc::clone(mask);
            }
        }

        let padded = 2 * frame.width.max(frame.height);
        debug!(period, size = padded, frame = %frame, "Rebuilding apodization mask");
        let mask = Arc::new(ApodizationMask::cosine(period, padded));
        self.key = Some(key);
        self.mask = Some(Arc::clone(&mask));
        mask
    }
}
