use ndarray::Array2;

use crate::frame::Frame;
use crate::optics::fft::{fft2_centered, ifft2_centered, to_complex};

/// Which side of the cutoff a frequency filter keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassBand {
    Low,
    High,
}

/// Ideal circular frequency filter on the centered spectrum.
///
/// `cutoff` is a radius normalized so 1.0 reaches the Nyquist frequency of the
/// shorter axis. The magnitude of the filtered image is rescaled to [0, 1].
pub fn frequency_filter(frame: &Frame, cutoff: f32, band: PassBand) -> Frame {
    let data = frequency_filter_array(&frame.data, cutoff, band);
    Frame::new(data, frame.original_bit_depth)
}

pub fn frequency_filter_array(data: &Array2<f32>, cutoff: f32, band: PassBand) -> Array2<f32> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return data.clone();
    }

    let mut spectrum = fft2_centered(&to_complex(data));
    let cy = (h / 2) as f64;
    let cx = (w / 2) as f64;
    let nyquist = (h.min(w) as f64 / 2.0).max(1.0);
    let radius = cutoff.max(0.0) as f64 * nyquist;

    for ((row, col), v) in spectrum.indexed_iter_mut() {
        let dist = ((row as f64 - cy).powi(2) + (col as f64 - cx).powi(2)).sqrt();
        let keep = match band {
            PassBand::Low => dist <= radius,
            PassBand::High => dist > radius,
        };
        if !keep {
            *v = num_complex::Complex::new(0.0, 0.0);
        }
    }

    let filtered = ifft2_centered(&spectrum).mapv(|v| v.norm());
    super::levels::normalize(&filtered, 1.0).mapv(|v| v as f32)
}
