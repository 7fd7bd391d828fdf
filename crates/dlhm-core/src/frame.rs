use ndarray::Array2;
use num_complex::Complex;
use std::path::PathBuf;

/// Complex optical field sampled on a regular grid, shape = (rows, cols).
pub type ComplexField = Array2<Complex<f64>>;

/// A single captured intensity frame.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// Original bit depth before conversion (8 or 16)
    pub original_bit_depth: u8,
    /// Optional per-frame metadata
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array2<f32>, bit_depth: u8) -> Self {
        Self {
            data,
            original_bit_depth: bit_depth,
            metadata: FrameMetadata::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Field amplitude from recorded intensity: elementwise square root with
    /// zero initial phase. Negative samples (e.g. after reference
    /// subtraction) are clamped to zero first.
    pub fn to_field(&self) -> ComplexField {
        self.data
            .mapv(|v| Complex::new((v.max(0.0) as f64).sqrt(), 0.0))
    }

    /// Subtract a reference frame of identical shape, clamping at zero.
    /// Mismatched shapes leave the frame untouched.
    pub fn subtract_reference(&self, reference: &Frame) -> Frame {
        if reference.data.dim() != self.data.dim() {
            return self.clone();
        }
        let data = ndarray::Zip::from(&self.data)
            .and(&reference.data)
            .map_collect(|&v, &r| (v - r).max(0.0));
        Frame {
            data,
            original_bit_depth: self.original_bit_depth,
            metadata: self.metadata.clone(),
        }
    }

    /// Mirror the frame left to right.
    pub fn mirrored(&self) -> Frame {
        let data = self.data.slice(ndarray::s![.., ..;-1]).to_owned();
        Frame {
            data,
            original_bit_depth: self.original_bit_depth,
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    pub frame_index: usize,
    pub timestamp_us: Option<u64>,
}

/// Frame dimensions in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSize {
    pub width: usize,
    pub height: usize,
}

impl FrameSize {
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Metadata about a frame source.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub observer: Option<String>,
    pub instrument: Option<String>,
}
