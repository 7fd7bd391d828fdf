use std::f64::consts::TAU;

use ndarray::Array2;
use num_complex::Complex;

use dlhm_core::frame::FrameSize;
use dlhm_core::optics::apodization::{fit_centered, ApodizationMask, MaskCache};
use dlhm_core::optics::kreuzer::{kreuzer_reconstruct, KreuzerGeometry};
use dlhm_core::source::SyntheticHologram;

fn hologram(width: usize, height: usize) -> Array2<f64> {
    SyntheticHologram {
        width,
        height,
        wavelength: 0.405,
        pixel_pitch: 2.2,
        distance: 800.0,
        contrast: 0.4,
        offset: (3.0, -2.0),
    }
    .render()
    .mapv(|v| (v as f64).sqrt())
}

fn geometry() -> KreuzerGeometry {
    KreuzerGeometry::new(1_200.0, 2_000.0, 0.405, 2.2)
}

// Point-source DLHM geometry: 256 px at 2.2 um, 405 nm, sensor at 2 mm.
const POINT_N: usize = 256;
const POINT_DX: f64 = 2.2;
const POINT_LAMBDA: f64 = 0.405;
const POINT_L: f64 = 2_000.0;
const POINT_Z: f64 = 1_000.0;

/// Normalized intensity of a spherical reference from the source plus a
/// weak scatterer at `POINT_Z` from the source, shifted `x0` um along x.
fn point_object_hologram(x0: f64) -> Array2<f64> {
    let k = TAU / POINT_LAMBDA;
    let c = POINT_N as f64 / 2.0;
    let to_object = (x0 * x0 + POINT_Z * POINT_Z).sqrt();
    let raw = Array2::from_shape_fn((POINT_N, POINT_N), |(row, col)| {
        let x = (col as f64 - c) * POINT_DX;
        let y = (row as f64 - c) * POINT_DX;
        let r = (x * x + y * y + POINT_L * POINT_L).sqrt();
        let reference = Complex::from_polar(1.0 / r, k * r);
        let d = ((x - x0).powi(2) + y * y + (POINT_L - POINT_Z).powi(2)).sqrt();
        let scattered = Complex::from_polar(0.2 * POINT_L / (to_object * d), k * (to_object + d));
        (reference + scattered).norm_sqr()
    });
    let max = raw.iter().cloned().fold(f64::MIN, f64::max);
    raw / max
}

fn reconstruct_point_at(holo: &Array2<f64>, zr: f64) -> Array2<f64> {
    let geometry = KreuzerGeometry::new(zr, POINT_L, POINT_LAMBDA, POINT_DX);
    let mask = ApodizationMask::cosine(2.0, 2 * POINT_N);
    kreuzer_reconstruct(holo, &geometry, &mask)
}

fn brightest(out: &Array2<f64>) -> (usize, usize) {
    let mut best = ((0, 0), f64::MIN);
    for ((r, c), &v) in out.indexed_iter() {
        if v > best.1 {
            best = ((r, c), v);
        }
    }
    best.0
}

fn assert_unit_range(out: &Array2<f64>) {
    for &v in out.iter() {
        assert!(v.is_finite(), "non-finite output sample");
        assert!((0.0..=1.0).contains(&v), "sample {v} outside [0, 1]");
    }
}

// ---------------------------------------------------------------------------
// Apodization mask
// ---------------------------------------------------------------------------

#[test]
fn test_mask_peaks_at_one_and_is_non_negative() {
    let mask = ApodizationMask::cosine(2.0, 64);
    let max = mask.data().iter().cloned().fold(f64::MIN, f64::max);
    assert!((max - 1.0).abs() < 1e-12);
    assert!(mask.data().iter().all(|&v| v >= 0.0));
    assert_eq!(mask.dim(), (64, 64));
}

#[test]
fn test_mask_is_symmetric() {
    let mask = ApodizationMask::cosine_rect(3.0, 20, 30);
    let d = mask.data();
    for r in 0..20 {
        for c in 0..30 {
            assert!((d[[r, c]] - d[[19 - r, 29 - c]]).abs() < 1e-12);
        }
    }
}

#[test]
fn test_fit_centered_pads_and_crops() {
    let data = Array2::from_elem((4, 4), 1.0f64);
    let padded = fit_centered(&data, 8, 6);
    assert_eq!(padded.dim(), (8, 6));
    assert_eq!(padded.sum(), 16.0);
    assert_eq!(padded[[0, 0]], 0.0);
    assert_eq!(padded[[4, 3]], 1.0);

    let cropped = fit_centered(&padded, 4, 4);
    assert_eq!(cropped.sum(), 16.0);
}

#[test]
fn test_mask_cache_reuses_until_key_changes() {
    let mut cache = MaskCache::new();
    let size = FrameSize {
        width: 32,
        height: 32,
    };
    let a = cache.get(2.0, size);
    let b = cache.get(2.0, size);
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(a.dim(), (64, 64));

    let c = cache.get(3.0, size);
    assert!(!std::sync::Arc::ptr_eq(&a, &c));

    let d = cache.get(
        3.0,
        FrameSize {
            width: 40,
            height: 24,
        },
    );
    assert_eq!(d.dim(), (80, 80));
}

// ---------------------------------------------------------------------------
// Reconstruction
// ---------------------------------------------------------------------------

#[test]
fn test_kreuzer_square_shape_and_range() {
    let holo = hologram(64, 64);
    let mask = ApodizationMask::cosine(2.0, 128);
    let out = kreuzer_reconstruct(&holo, &geometry(), &mask);
    assert_eq!(out.dim(), (64, 64));
    assert_unit_range(&out);
    let max = out.iter().cloned().fold(f64::MIN, f64::max);
    assert!((max - 1.0).abs() < 1e-12, "expected normalized max 1, got {max}");
}

#[test]
fn test_kreuzer_mask_mismatch_is_resized() {
    let holo = hologram(32, 32);
    for side in [20, 64, 200] {
        let mask = ApodizationMask::cosine(2.0, side);
        let out = kreuzer_reconstruct(&holo, &geometry(), &mask);
        assert_eq!(out.dim(), (32, 32));
        assert_unit_range(&out);
    }
}

#[test]
fn test_kreuzer_non_square_keeps_shape() {
    let holo = hologram(48, 32);
    let mask = ApodizationMask::cosine(2.0, 96);
    let out = kreuzer_reconstruct(&holo, &geometry(), &mask);
    assert_eq!(out.dim(), (32, 48));
    assert_unit_range(&out);
}

#[test]
fn test_kreuzer_zero_hologram_is_all_zero() {
    let holo = Array2::<f64>::zeros((16, 16));
    let mask = ApodizationMask::cosine(2.0, 32);
    let out = kreuzer_reconstruct(&holo, &geometry(), &mask);
    assert!(out.iter().all(|&v| v == 0.0));
}

#[test]
fn test_kreuzer_does_not_mutate_mask() {
    let holo = hologram(16, 16);
    let mask = ApodizationMask::cosine(2.0, 32);
    let before = mask.data().clone();
    let _ = kreuzer_reconstruct(&holo, &geometry(), &mask);
    assert_eq!(mask.data(), &before);
}

// With the field carried over `L - z`, a point scatterer at z = 1000 um
// comes to focus near zr = 1300 um rather than at its own plane.
#[test]
fn test_kreuzer_point_object_sharpest_plane() {
    let holo = point_object_hologram(30.0);
    let means: Vec<(f64, f64)> = [1_000.0, 1_100.0, 1_200.0, 1_300.0, 1_400.0]
        .iter()
        .map(|&zr| (zr, reconstruct_point_at(&holo, zr).mean().unwrap()))
        .collect();

    let (sharpest, sharpest_mean) = means
        .iter()
        .cloned()
        .fold((0.0, f64::MAX), |acc, m| if m.1 < acc.1 { m } else { acc });
    assert_eq!(sharpest, 1_300.0, "means per plane: {means:?}");
    assert!(sharpest_mean < 0.01, "focused mean {sharpest_mean}");

    let at_object_plane = means[0].1;
    assert!(at_object_plane > 0.1, "object-plane mean {at_object_plane}");
}

#[test]
fn test_kreuzer_point_object_peak_follows_offset() {
    let zr = 1_300.0;
    for (x0, cols) in [(0.0, 126..=132), (30.0, 148..=154), (-30.0, 103..=109)] {
        let out = reconstruct_point_at(&point_object_hologram(x0), zr);
        let (r, c) = brightest(&out);
        assert!((126..=132).contains(&r), "x0 = {x0}: peak row {r}");
        assert!(cols.contains(&c), "x0 = {x0}: peak col {c}, expected {cols:?}");
    }
}

#[test]
fn test_geometry_reconstruction_pitch() {
    let g = KreuzerGeometry::new(5_000.0, 10_000.0, 0.532, 1.85);
    assert!((g.delta_x - 0.925).abs() < 1e-12);
}
