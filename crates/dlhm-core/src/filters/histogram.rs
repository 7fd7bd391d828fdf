use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::{EQUALIZATION_BINS, PARALLEL_PIXEL_THRESHOLD};
use crate::frame::Frame;

/// Contrast-limited adaptive histogram equalization.
///
/// The frame is split into `tiles × tiles` regions. Each region gets its own
/// clipped histogram and cumulative mapping; pixels are remapped by bilinear
/// interpolation between the mappings of the four nearest region centres.
/// `clip_limit` is the fraction of a region's pixels any single bin may hold
/// (0 disables clipping).
pub fn adaptive_equalize(frame: &Frame, tiles: usize, clip_limit: f32) -> Frame {
    let data = adaptive_equalize_array(&frame.data, tiles, clip_limit);
    Frame::new(data, frame.original_bit_depth)
}

pub fn adaptive_equalize_array(data: &Array2<f32>, tiles: usize, clip_limit: f32) -> Array2<f32> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return data.clone();
    }
    let tiles_y = tiles.clamp(1, h);
    let tiles_x = tiles.clamp(1, w);
    let tile_h = h.div_ceil(tiles_y);
    let tile_w = w.div_ceil(tiles_x);

    let luts: Vec<Vec<f32>> = (0..tiles_y * tiles_x)
        .map(|t| {
            let (ty, tx) = (t / tiles_x, t % tiles_x);
            let r0 = ty * tile_h;
            let c0 = tx * tile_w;
            let r1 = (r0 + tile_h).min(h);
            let c1 = (c0 + tile_w).min(w);
            tile_lut(data, r0, r1, c0, c1, clip_limit)
        })
        .collect();

    let map_pixel = |row: usize, col: usize| -> f32 {
        let bin = to_bin(data[[row, col]]);

        // Position relative to tile centres, in tile units.
        let gy = (row as f32 + 0.5) / tile_h as f32 - 0.5;
        let gx = (col as f32 + 0.5) / tile_w as f32 - 0.5;
        let y0 = gy.floor().clamp(0.0, (tiles_y - 1) as f32) as usize;
        let x0 = gx.floor().clamp(0.0, (tiles_x - 1) as f32) as usize;
        let y1 = (y0 + 1).min(tiles_y - 1);
        let x1 = (x0 + 1).min(tiles_x - 1);
        let fy = (gy - y0 as f32).clamp(0.0, 1.0);
        let fx = (gx - x0 as f32).clamp(0.0, 1.0);

        let lut = |ty: usize, tx: usize| luts[ty * tiles_x + tx][bin];
        let top = lut(y0, x0) * (1.0 - fx) + lut(y0, x1) * fx;
        let bottom = lut(y1, x0) * (1.0 - fx) + lut(y1, x1) * fx;
        top * (1.0 - fy) + bottom * fy
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| (0..w).map(|col| map_pixel(row, col)).collect())
            .collect();
        let mut result = Array2::<f32>::zeros((h, w));
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
        result
    } else {
        Array2::from_shape_fn((h, w), |(row, col)| map_pixel(row, col))
    }
}

fn to_bin(v: f32) -> usize {
    ((v.clamp(0.0, 1.0) * (EQUALIZATION_BINS - 1) as f32).round() as usize).min(EQUALIZATION_BINS - 1)
}

/// Clipped cumulative mapping for one region, values in [0, 1].
fn tile_lut(data: &Array2<f32>, r0: usize, r1: usize, c0: usize, c1: usize, clip_limit: f32) -> Vec<f32> {
    let mut hist = vec![0.0f32; EQUALIZATION_BINS];
    for row in r0..r1 {
        for col in c0..c1 {
            hist[to_bin(data[[row, col]])] += 1.0;
        }
    }
    let count = (r1.saturating_sub(r0) * c1.saturating_sub(c0)) as f32;
    if count == 0.0 {
        return (0..EQUALIZATION_BINS)
            .map(|b| b as f32 / (EQUALIZATION_BINS - 1) as f32)
            .collect();
    }

    if clip_limit > 0.0 {
        let limit = (clip_limit * count).max(1.0);
        let mut excess = 0.0f32;
        for v in hist.iter_mut() {
            if *v > limit {
                excess += *v - limit;
                *v = limit;
            }
        }
        let share = excess / EQUALIZATION_BINS as f32;
        for v in hist.iter_mut() {
            *v += share;
        }
    }

    let mut cdf = Vec::with_capacity(EQUALIZATION_BINS);
    let mut acc = 0.0f32;
    for v in &hist {
        acc += v;
        cdf.push(acc);
    }
    let total = acc.max(f32::EPSILON);
    cdf.iter().map(|v| (v / total).clamp(0.0, 1.0)).collect()
}
