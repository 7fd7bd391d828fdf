pub mod compensate;
pub mod config;
pub mod filter;
pub mod focus;
pub mod info;
pub mod live;
pub mod reconstruct;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use dlhm_core::config::SessionConfig;
use dlhm_core::frame::Frame;
use dlhm_core::io::image_io::{load_image, RasterFormat};
use dlhm_core::io::ser::SerReader;
use dlhm_core::params::{Algorithm, OutputMode, ReconstructionParameters};

#[derive(Clone, Copy, ValueEnum)]
pub enum AlgorithmArg {
    AngularSpectrum,
    Kreuzer,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::AngularSpectrum => Algorithm::AngularSpectrum,
            AlgorithmArg::Kreuzer => Algorithm::Kreuzer,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputModeArg {
    Amplitude,
    Intensity,
    Phase,
}

impl From<OutputModeArg> for OutputMode {
    fn from(arg: OutputModeArg) -> Self {
        match arg {
            OutputModeArg::Amplitude => OutputMode::Amplitude,
            OutputModeArg::Intensity => OutputMode::Intensity,
            OutputModeArg::Phase => OutputMode::Phase,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Png,
    Bmp,
    Tiff,
}

impl From<FormatArg> for RasterFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => RasterFormat::Png,
            FormatArg::Bmp => RasterFormat::Bmp,
            FormatArg::Tiff => RasterFormat::Tiff,
        }
    }
}

/// Geometry overrides shared by the reconstruction commands.
#[derive(Args)]
pub struct OpticsArgs {
    /// Source-to-sensor distance L in micrometres
    #[arg(long)]
    pub l: Option<f64>,

    /// Source-to-sample distance Z in micrometres
    #[arg(long)]
    pub z: Option<f64>,

    /// Wavelength in micrometres
    #[arg(long)]
    pub wavelength: Option<f64>,

    /// Sensor pixel pitch in micrometres
    #[arg(long)]
    pub pitch: Option<f64>,

    /// Apodization cosine period
    #[arg(long)]
    pub cosine_period: Option<f64>,
}

impl OpticsArgs {
    pub fn apply(&self, params: &mut ReconstructionParameters) {
        if let Some(l) = self.l {
            params.l = l;
        }
        if let Some(z) = self.z {
            params.z = z;
        }
        if let Some(wavelength) = self.wavelength {
            params.wavelength = wavelength;
        }
        if let Some(pitch) = self.pitch {
            params.pixel_pitch = pitch;
        }
        if let Some(period) = self.cosine_period {
            params.cosine_period = period;
        }
    }
}

/// Session config from `path`, or the defaults.
pub fn load_session(path: Option<&PathBuf>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

/// First frame of a SER recording, or any raster.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let is_ser = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ser"));
    let frame = if is_ser {
        SerReader::open(path).and_then(|reader| reader.read_frame(0))
    } else {
        load_image(path)
    };
    frame.with_context(|| format!("Failed to load {}", path.display()))
}
