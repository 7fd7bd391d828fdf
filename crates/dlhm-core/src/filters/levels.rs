use ndarray::Array2;
use num_traits::Float;

use crate::frame::Frame;

/// Shift `data` so its minimum is zero and scale so its maximum is `scale`.
///
/// A constant input has a zero range; the denominator falls back to 1 and the
/// result is all zeros instead of NaN.
pub fn normalize<A: Float>(data: &Array2<A>, scale: A) -> Array2<A> {
    let min = data.iter().cloned().fold(A::infinity(), A::min);
    if !min.is_finite() {
        return Array2::zeros(data.dim());
    }
    let max = data.iter().fold(A::zero(), |acc, &v| acc.max(v - min));
    let denom = if max == A::zero() { A::one() } else { max };
    data.mapv(|v| scale * (v - min) / denom)
}

/// Normalize to `[0, 255]` and quantize to 8 bits.
pub fn normalize_to_u8<A: Float>(data: &Array2<A>) -> Array2<u8> {
    let scale = A::from(255.0).unwrap_or_else(A::one);
    normalize(data, scale).mapv(|v| v.round().to_u8().unwrap_or(0))
}

/// Apply gain and gamma: `output = gain · input^gamma`, clamped to [0, 1].
///
/// gamma < 1.0 brightens midtones, gamma > 1.0 darkens them.
pub fn gamma_correct(frame: &Frame, gamma: f32, gain: f32) -> Frame {
    let data = frame
        .data
        .mapv(|v| (gain * v.clamp(0.0, 1.0).powf(gamma)).clamp(0.0, 1.0));
    Frame::new(data, frame.original_bit_depth)
}

/// Adjust brightness and contrast.
///
/// `brightness` is added (range roughly -1.0..1.0).
/// `contrast` is multiplied around 0.5 midpoint (1.0 = no change, >1.0 = more contrast).
pub fn brightness_contrast(frame: &Frame, brightness: f32, contrast: f32) -> Frame {
    let data = frame.data.mapv(|v| {
        let adjusted = (v - 0.5) * contrast + 0.5 + brightness;
        adjusted.clamp(0.0, 1.0)
    });
    Frame::new(data, frame.original_bit_depth)
}
