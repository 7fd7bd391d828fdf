use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compensation::CompensationConfig;
use crate::consts::DEFAULT_DISPLAY_TICK_MS;
use crate::error::{DlhmError, Result};
use crate::filters::FilterStep;
use crate::io::image_io::RasterFormat;
use crate::params::ReconstructionParameters;
use crate::source::SourceConfig;

/// Everything needed to run a session, loadable from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub source: SourceConfig,
    pub parameters: ReconstructionParameters,
    pub capture_filters: Vec<FilterStep>,
    pub reconstruction_filters: Vec<FilterStep>,
    pub compensation: CompensationConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Polling interval of the display loop.
    pub tick_ms: u64,
    /// Keep `r = L − Z` fixed while editing `L` or `Z`.
    pub fix_r: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_DISPLAY_TICK_MS,
            fix_r: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: PathBuf,
    pub format: RasterFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("exports"),
            format: RasterFormat::Png,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| DlhmError::Config(e.to_string()))?;
        config.parameters.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DlhmError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
