use std::path::Path;

use image::{ColorType, GrayImage, ImageBuffer, ImageFormat, Luma};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{DlhmError, Result};
use crate::frame::Frame;

/// Raster formats written by the exporter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RasterFormat {
    #[default]
    Png,
    Bmp,
    Tiff,
}

impl RasterFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

impl std::fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

/// Save an 8-bit raster.
pub fn save_gray8(data: &Array2<u8>, path: &Path, format: RasterFormat) -> Result<()> {
    let (h, w) = data.dim();
    let pixels: Vec<u8> = data.iter().copied().collect();
    let img = GrayImage::from_raw(w as u32, h as u32, pixels).ok_or(
        DlhmError::InvalidDimensions {
            width: w as u32,
            height: h as u32,
        },
    )?;
    img.save_with_format(path, format.image_format())?;
    Ok(())
}

/// Save a frame as 16-bit grayscale TIFF.
pub fn save_tiff16(frame: &Frame, path: &Path) -> Result<()> {
    let (h, w) = frame.data.dim();
    let pixels: Vec<u16> = frame
        .data
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 65535.0) as u16)
        .collect();
    let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels).ok_or(
        DlhmError::InvalidDimensions {
            width: w as u32,
            height: h as u32,
        },
    )?;
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save a `[0, 1]` frame as 8-bit, format chosen from the extension
/// (PNG when unknown).
pub fn save_image(frame: &Frame, path: &Path) -> Result<()> {
    let format = RasterFormat::from_path(path).unwrap_or_default();
    save_gray8(&frame_to_u8(frame), path, format)
}

/// Quantize a `[0, 1]` frame to 8 bits without rescaling.
pub fn frame_to_u8(frame: &Frame) -> Array2<u8> {
    frame.data.mapv(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Load any raster as grayscale in `[0, 1]`. Colour images are converted
/// to luma; the recorded bit depth is 16 for 16-bit sources and 8 otherwise.
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let bit_depth = match img.color() {
        ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16 => 16,
        _ => 8,
    };
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return Err(DlhmError::InvalidDimensions {
            width: w,
            height: h,
        });
    }

    let data = Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
        gray.get_pixel(col as u32, row as u32).0[0] as f32 / 65535.0
    });

    Ok(Frame::new(data, bit_depth))
}
