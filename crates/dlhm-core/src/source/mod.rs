//! Frame sources feeding the capture worker.

pub mod file;
pub mod synthetic;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::frame::{Frame, FrameSize, SourceInfo};

pub use file::{SerSource, StillImageSource};
pub use synthetic::{SyntheticHologram, SyntheticSource};

/// Anything that yields intensity frames in `[0, 1]`.
pub trait FrameSource: Send {
    /// Acquire the next frame.
    fn next_frame(&mut self) -> Result<Frame>;

    fn resolution(&self) -> FrameSize;

    fn info(&self) -> SourceInfo;
}

/// Which source to open.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SourceKind {
    Image { path: PathBuf },
    Ser { path: PathBuf },
    Synthetic { hologram: SyntheticHologram },
}

impl Default for SourceKind {
    fn default() -> Self {
        Self::Synthetic {
            hologram: SyntheticHologram::default(),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image { path } => write!(f, "image {}", path.display()),
            Self::Ser { path } => write!(f, "SER {}", path.display()),
            Self::Synthetic { hologram } => {
                write!(f, "synthetic {}x{}", hologram.width, hologram.height)
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Flip frames left to right as they are captured.
    pub mirror: bool,
    /// Background frame subtracted from every capture.
    pub reference: Option<PathBuf>,
}

/// Open the configured source. Failure here is fatal for the pipeline and is
/// reported as [`crate::error::DlhmError::SourceUnavailable`].
pub fn open_source(kind: &SourceKind) -> Result<Box<dyn FrameSource>> {
    let source: Box<dyn FrameSource> = match kind {
        SourceKind::Image { path } => Box::new(StillImageSource::open(path)?),
        SourceKind::Ser { path } => Box::new(SerSource::open(path)?),
        SourceKind::Synthetic { hologram } => Box::new(SyntheticSource::new(hologram.clone())?),
    };
    info!(source = %kind, resolution = %source.resolution(), "Frame source opened");
    Ok(source)
}
