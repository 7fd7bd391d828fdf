//! Memory-mapped reader for SER video recordings, used to replay a
//! recorded hologram stream as if it came from a camera.

use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array2;

use crate::error::{DlhmError, Result};
use crate::frame::{Frame, FrameMetadata, SourceInfo};

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// Colour ids with three interleaved planes per pixel.
const SER_RGB: i32 = 100;
const SER_BGR: i32 = 101;

#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
}

impl SerHeader {
    pub fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 {
            1
        } else {
            2
        }
    }

    pub fn planes(&self) -> usize {
        match self.color_id {
            SER_RGB | SER_BGR => 3,
            _ => 1,
        }
    }

    pub fn frame_byte_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bytes_per_sample() * self.planes())
    }
}

pub struct SerReader {
    mmap: Mmap,
    frame_bytes: usize,
    pub header: SerHeader,
}

impl SerReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and the recording is not expected
        // to be modified while it is replayed.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(DlhmError::InvalidSer("file too small for header".into()));
        }
        if &mmap[0..14] != SER_MAGIC {
            return Err(DlhmError::InvalidSer("missing LUCAM-RECORDER magic".into()));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        let frame_bytes = header
            .frame_byte_size()
            .ok_or_else(|| DlhmError::InvalidSer("frame size overflows".into()))?;

        let expected = SER_HEADER_SIZE + frame_bytes * header.frame_count as usize;
        if mmap.len() < expected {
            return Err(DlhmError::InvalidSer(format!(
                "truncated: expected at least {expected} bytes, got {}",
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            frame_bytes,
            header,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Decode one frame to `[0, 1]`. Colour recordings keep the green plane.
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let total = self.frame_count();
        if index >= total {
            return Err(DlhmError::FrameIndexOutOfRange { index, total });
        }
        let offset = SER_HEADER_SIZE + index * self.frame_bytes;
        let raw = &self.mmap[offset..offset + self.frame_bytes];

        let planes = self.header.planes();
        let plane = if planes == 3 { 1 } else { 0 };
        let data = decode_plane(raw, &self.header, planes, plane);

        let mut frame = Frame::new(data, self.header.bytes_per_sample() as u8 * 8);
        frame.metadata = FrameMetadata {
            frame_index: index,
            timestamp_us: self.read_timestamp(index),
        };
        Ok(frame)
    }

    /// Per-frame timestamp from the optional trailer.
    fn read_timestamp(&self, index: usize) -> Option<u64> {
        let trailer = SER_HEADER_SIZE + self.frame_bytes * self.frame_count();
        let at = trailer + index * 8;
        let bytes = self.mmap.get(at..at + 8)?;
        Some(u64::from_le_bytes(bytes.try_into().ok()?))
    }

    pub fn source_info(&self, path: &Path) -> SourceInfo {
        SourceInfo {
            filename: path.to_path_buf(),
            total_frames: self.frame_count(),
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.pixel_depth as u8,
            observer: non_empty(&self.header.observer),
            instrument: non_empty(&self.header.instrument),
        }
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]);

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()? as u32;
    let height = cursor.read_i32::<LittleEndian>()? as u32;
    let pixel_depth = cursor.read_i32::<LittleEndian>()? as u32;
    let frame_count = cursor.read_i32::<LittleEndian>()? as u32;

    if width == 0 || height == 0 {
        return Err(DlhmError::InvalidDimensions { width, height });
    }
    if pixel_depth == 0 || pixel_depth > 16 {
        return Err(DlhmError::InvalidSer(format!(
            "unsupported pixel depth {pixel_depth}"
        )));
    }

    Ok(SerHeader {
        color_id,
        // Most writers store 0 for little-endian data despite the format notes.
        little_endian: le_flag != 1,
        width,
        height,
        pixel_depth,
        frame_count,
        observer: read_fixed_string(&buf[42..82]),
        instrument: read_fixed_string(&buf[82..122]),
    })
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn decode_plane(raw: &[u8], header: &SerHeader, planes: usize, plane: usize) -> Array2<f32> {
    let h = header.height as usize;
    let w = header.width as usize;
    let bps = header.bytes_per_sample();
    let max_val = ((1u32 << header.pixel_depth) - 1) as f32;

    Array2::from_shape_fn((h, w), |(row, col)| {
        let idx = ((row * w + col) * planes + plane) * bps;
        let val = if bps == 1 {
            raw[idx] as f32
        } else {
            let pair = [raw[idx], raw[idx + 1]];
            if header.little_endian {
                u16::from_le_bytes(pair) as f32
            } else {
                u16::from_be_bytes(pair) as f32
            }
        };
        val / max_val
    })
}
