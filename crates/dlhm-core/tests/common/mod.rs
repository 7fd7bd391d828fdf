#![allow(dead_code)]

use std::f64::consts::{PI, TAU};

use dlhm_core::frame::ComplexField;
use dlhm_core::io::ser::SER_HEADER_SIZE;
use ndarray::Array2;
use num_complex::Complex;

/// Build a SER file header for mono frames.
///
/// Returns a `Vec<u8>` containing just the 178-byte header.
/// Append frame pixel data after calling this function.
pub fn build_ser_header(width: u32, height: u32, bit_depth: u32, num_frames: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID, ColorID = MONO, LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer (40 bytes)
    let mut observer = [0u8; 40];
    observer[..3].copy_from_slice(b"Lab");
    buf.extend_from_slice(&observer);
    // Instrument, telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime, DateTimeUTC
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete 8-bit mono SER file with the given frame data.
pub fn build_ser_with_frames(width: u32, height: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, 8, frames.len());
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Write a SER buffer to a temporary file and return the temp file handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}

/// Diverging spherical wave `exp(i·k·r)/r` from an on-axis point at
/// distance `z`, sampled around index `n/2`.
pub fn point_source_field(n: usize, dx: f64, wavelength: f64, z: f64) -> ComplexField {
    let k = TAU / wavelength;
    let c = (n / 2) as f64;
    Array2::from_shape_fn((n, n), |(row, col)| {
        let x = (col as f64 - c) * dx;
        let y = (row as f64 - c) * dx;
        let r = (x * x + y * y + z * z).sqrt();
        Complex::from_polar(1.0 / r, k * r)
    })
}

/// Smooth band-limited test field: a Gaussian envelope with a gentle phase
/// ramp, well inside the propagating band.
pub fn gaussian_beam(n: usize, sigma: f64) -> ComplexField {
    let c = (n / 2) as f64;
    Array2::from_shape_fn((n, n), |(row, col)| {
        let x = col as f64 - c;
        let y = row as f64 - c;
        let amp = (-(x * x + y * y) / (2.0 * sigma * sigma)).exp();
        Complex::from_polar(amp, 0.05 * x)
    })
}

/// Unit-amplitude field with a linear carrier of `(fx*, fy*)` spectrum pixels
/// (measured like the sideband peak, centre at `n/2`) and a phase dip of
/// `depth` radians inside a centred disk.
pub fn tilted_dip_field(n: usize, fx_star: f64, fy_star: f64, depth: f64, radius: f64) -> ComplexField {
    let half = (n / 2) as f64;
    let nf = n as f64;
    Array2::from_shape_fn((n, n), |(row, col)| {
        let m = col as f64 - half;
        let q = row as f64 - half;
        let object = if m * m + q * q < radius * radius { -depth } else { 0.0 };
        let carrier = -2.0 * PI * ((half - fx_star) * m / nf + (half - fy_star) * q / nf);
        Complex::from_polar(1.0, object + carrier)
    })
}

/// Off-axis fringe pattern `|1 + exp(i·2π(u·m − v·q)/n)|² / 4`.
pub fn fringe_hologram(n: usize, u: f64, v: f64) -> Array2<f32> {
    let nf = n as f64;
    Array2::from_shape_fn((n, n), |(row, col)| {
        let phase = TAU * (u * col as f64 - v * row as f64) / nf;
        ((Complex::new(1.0, 0.0) + Complex::from_polar(1.0, phase)).norm_sqr() / 4.0) as f32
    })
}

/// Horizontal ramp from 0 to 1.
pub fn ramp(h: usize, w: usize) -> Array2<f32> {
    let denom = (w.max(2) - 1) as f32;
    Array2::from_shape_fn((h, w), |(_, col)| col as f32 / denom)
}

/// Checkerboard with `cell`-pixel squares at levels 0.2 / 0.8.
pub fn checkerboard(h: usize, w: usize, cell: usize) -> Array2<f32> {
    Array2::from_shape_fn((h, w), |(row, col)| {
        if (row / cell + col / cell) % 2 == 0 {
            0.2
        } else {
            0.8
        }
    })
}
