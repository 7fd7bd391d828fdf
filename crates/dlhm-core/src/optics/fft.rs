use std::sync::Arc;

use ndarray::{Array2, Axis};
use num_complex::Complex;
use rayon::prelude::*;
use rustfft::{Fft, FftDirection, FftPlanner};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::frame::ComplexField;

// ---------------------------------------------------------------------------
// Raw 2D transforms
// ---------------------------------------------------------------------------

/// In-place 2D FFT over rows then columns. The inverse direction is scaled by
/// `1/(h*w)` so that `ifft2(fft2(x)) == x`.
fn fft2d_in_place(data: &mut ComplexField, direction: FftDirection) {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return;
    }
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft(w, direction);
    let fft_col = planner.plan_fft(h, direction);

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        transform_lanes_parallel(data, Axis(0), &fft_row);
        transform_lanes_parallel(data, Axis(1), &fft_col);
    } else {
        transform_lanes_sequential(data, Axis(0), &fft_row);
        transform_lanes_sequential(data, Axis(1), &fft_col);
    }

    if direction == FftDirection::Inverse {
        let scale = 1.0 / (h * w) as f64;
        data.mapv_inplace(|v| v * scale);
    }
}

/// Transform every lane obtained by iterating along `axis`
/// (`Axis(0)` yields rows, `Axis(1)` yields columns).
fn transform_lanes_parallel(data: &mut ComplexField, axis: Axis, fft: &Arc<dyn Fft<f64>>) {
    data.axis_iter_mut(axis)
        .into_par_iter()
        .for_each(|mut lane| {
            let mut buf: Vec<Complex<f64>> = lane.iter().copied().collect();
            fft.process(&mut buf);
            for (dst, src) in lane.iter_mut().zip(buf) {
                *dst = src;
            }
        });
}

fn transform_lanes_sequential(data: &mut ComplexField, axis: Axis, fft: &Arc<dyn Fft<f64>>) {
    let mut buf: Vec<Complex<f64>> = Vec::new();
    for mut lane in data.axis_iter_mut(axis) {
        buf.clear();
        buf.extend(lane.iter().copied());
        fft.process(&mut buf);
        for (dst, src) in lane.iter_mut().zip(buf.iter()) {
            *dst = *src;
        }
    }
}

/// Unshifted forward 2D FFT.
pub fn fft2(data: &ComplexField) -> ComplexField {
    let mut work = data.clone();
    fft2d_in_place(&mut work, FftDirection::Forward);
    work
}

/// Unshifted inverse 2D FFT, normalized by `1/(h*w)`.
pub fn ifft2(data: &ComplexField) -> ComplexField {
    let mut work = data.clone();
    fft2d_in_place(&mut work, FftDirection::Inverse);
    work
}

// ---------------------------------------------------------------------------
// Quadrant shifts
// ---------------------------------------------------------------------------

/// Move the zero-frequency sample to the array centre, at index `(h/2, w/2)`.
pub fn fftshift<T: Copy + num_traits::Zero>(data: &Array2<T>) -> Array2<T> {
    let (h, w) = data.dim();
    roll(data, h / 2, w / 2)
}

/// Inverse of [`fftshift`]; differs from it only for odd dimensions.
pub fn ifftshift<T: Copy + num_traits::Zero>(data: &Array2<T>) -> Array2<T> {
    let (h, w) = data.dim();
    roll(data, h - h / 2, w - w / 2)
}

fn roll<T: Copy + num_traits::Zero>(data: &Array2<T>, dy: usize, dx: usize) -> Array2<T> {
    let (h, w) = data.dim();
    let mut out = Array2::<T>::zeros((h, w));
    for ((row, col), &v) in data.indexed_iter() {
        out[[(row + dy) % h, (col + dx) % w]] = v;
    }
    out
}

// ---------------------------------------------------------------------------
// Centered transforms
// ---------------------------------------------------------------------------

/// Centered forward transform: `fftshift(fft2(fftshift(x)))`.
pub fn fft2_centered(data: &ComplexField) -> ComplexField {
    let mut work = fftshift(data);
    fft2d_in_place(&mut work, FftDirection::Forward);
    fftshift(&work)
}

/// Centered inverse transform: `ifftshift(ifft2(ifftshift(x)))`.
pub fn ifft2_centered(data: &ComplexField) -> ComplexField {
    let mut work = ifftshift(data);
    fft2d_in_place(&mut work, FftDirection::Inverse);
    ifftshift(&work)
}

/// Lift a real raster into a complex field with zero imaginary part.
pub fn to_complex(data: &Array2<f32>) -> ComplexField {
    data.mapv(|v| Complex::new(v as f64, 0.0))
}
