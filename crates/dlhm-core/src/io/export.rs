use std::path::{Path, PathBuf};

use ndarray::Array2;
use tracing::info;

use crate::error::Result;
use crate::filters::levels::normalize_to_u8;
use crate::frame::ComplexField;

use super::image_io::{save_gray8, RasterFormat};

/// Writes numbered rasters into one directory without ever overwriting.
///
/// Names follow `{prefix}-{NNNN}.{ext}`; the number is the lowest one not
/// yet used on disk for that prefix, starting at 1.
#[derive(Clone, Debug)]
pub struct Exporter {
    dir: PathBuf,
    format: RasterFormat,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>, format: RasterFormat) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, format })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> RasterFormat {
        self.format
    }

    /// Save an 8-bit raster under the next free name for `prefix`.
    pub fn export(&self, prefix: &str, data: &Array2<u8>) -> Result<PathBuf> {
        let index = self.next_index(&[prefix]);
        let path = self.path_for(prefix, index);
        save_gray8(data, &path, self.format)?;
        info!(path = %path.display(), "Exported image");
        Ok(path)
    }

    /// Save amplitude and phase of a complex field as a numbered pair sharing
    /// one index.
    pub fn export_field(&self, field: &ComplexField) -> Result<(PathBuf, PathBuf)> {
        let index = self.next_index(&["amplitude", "phase"]);
        let amplitude_path = self.path_for("amplitude", index);
        let phase_path = self.path_for("phase", index);

        save_gray8(&normalize_to_u8(&field.mapv(|v| v.norm())), &amplitude_path, self.format)?;
        save_gray8(&normalize_to_u8(&field.mapv(|v| v.arg())), &phase_path, self.format)?;

        info!(
            amplitude = %amplitude_path.display(),
            phase = %phase_path.display(),
            "Exported field"
        );
        Ok((amplitude_path, phase_path))
    }

    fn path_for(&self, prefix: &str, index: usize) -> PathBuf {
        self.dir
            .join(format!("{prefix}-{index:04}.{}", self.format.extension()))
    }

    fn next_index(&self, prefixes: &[&str]) -> usize {
        (1..)
            .find(|&i| prefixes.iter().all(|p| !self.path_for(p, i).exists()))
            .unwrap_or(1)
    }
}
