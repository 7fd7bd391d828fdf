use std::path::{Path, PathBuf};

use crate::error::{DlhmError, Result};
use crate::frame::{Frame, FrameSize, SourceInfo};
use crate::io::image_io::load_image;
use crate::io::ser::SerReader;

use super::FrameSource;

/// A single raster served over and over.
pub struct StillImageSource {
    path: PathBuf,
    frame: Frame,
    served: usize,
}

impl StillImageSource {
    pub fn open(path: &Path) -> Result<Self> {
        let frame = load_image(path).map_err(|e| {
            DlhmError::SourceUnavailable(format!("{}: {e}", path.display()))
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            frame,
            served: 0,
        })
    }
}

impl FrameSource for StillImageSource {
    fn next_frame(&mut self) -> Result<Frame> {
        let mut frame = self.frame.clone();
        frame.metadata.frame_index = self.served;
        self.served += 1;
        Ok(frame)
    }

    fn resolution(&self) -> FrameSize {
        self.frame.size()
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            filename: self.path.clone(),
            total_frames: 1,
            width: self.frame.width() as u32,
            height: self.frame.height() as u32,
            bit_depth: self.frame.original_bit_depth,
            observer: None,
            instrument: None,
        }
    }
}

/// Replays a SER recording frame by frame, wrapping at the end.
pub struct SerSource {
    path: PathBuf,
    reader: SerReader,
    next: usize,
}

impl SerSource {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = SerReader::open(path).map_err(|e| {
            DlhmError::SourceUnavailable(format!("{}: {e}", path.display()))
        })?;
        if reader.frame_count() == 0 {
            return Err(DlhmError::SourceUnavailable(format!(
                "{}: recording holds no frames",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
            reader,
            next: 0,
        })
    }
}

impl FrameSource for SerSource {
    fn next_frame(&mut self) -> Result<Frame> {
        let frame = self.reader.read_frame(self.next)?;
        self.next = (self.next + 1) % self.reader.frame_count();
        Ok(frame)
    }

    fn resolution(&self) -> FrameSize {
        FrameSize {
            width: self.reader.header.width as usize,
            height: self.reader.header.height as usize,
        }
    }

    fn info(&self) -> SourceInfo {
        self.reader.source_info(&self.path)
    }
}
