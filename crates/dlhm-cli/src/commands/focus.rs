use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use dlhm_core::filters::levels::normalize_to_u8;
use dlhm_core::focus::{focus_sweep, FocusMetric, SweepOptics, SweepRange};
use dlhm_core::io::export::Exporter;
use indicatif::{ProgressBar, ProgressStyle};

use super::{load_frame, load_session, FormatArg};

#[derive(Clone, Copy, ValueEnum)]
pub enum FocusMetricArg {
    Variance,
    Acutance,
    Combined,
}

impl From<FocusMetricArg> for FocusMetric {
    fn from(arg: FocusMetricArg) -> Self {
        match arg {
            FocusMetricArg::Variance => FocusMetric::Variance,
            FocusMetricArg::Acutance => FocusMetric::Acutance,
            FocusMetricArg::Combined => FocusMetric::Combined,
        }
    }
}

#[derive(Args)]
pub struct FocusArgs {
    /// Hologram image or SER recording (first frame is used)
    pub file: PathBuf,

    /// Session config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Nearest propagation distance in micrometres
    #[arg(long)]
    pub z_min: f64,

    /// Farthest propagation distance in micrometres
    #[arg(long)]
    pub z_max: f64,

    /// Number of distances, endpoints included
    #[arg(long, default_value = "50")]
    pub steps: usize,

    /// Figure of merit to minimise
    #[arg(long, value_enum, default_value = "variance")]
    pub metric: FocusMetricArg,

    /// Output plane magnification
    #[arg(long, default_value = "1.0")]
    pub scale: f64,

    /// Wavelength in micrometres
    #[arg(long)]
    pub wavelength: Option<f64>,

    /// Sensor pixel pitch in micrometres
    #[arg(long)]
    pub pitch: Option<f64>,

    /// Print the metric for every distance
    #[arg(long)]
    pub curve: bool,

    /// Export directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export raster format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

pub fn run(args: &FocusArgs) -> Result<()> {
    if args.steps == 0 {
        anyhow::bail!("--steps must be at least 1");
    }
    let session = load_session(args.config.as_ref())?;
    let pitch = args.pitch.unwrap_or(session.parameters.pixel_pitch);
    let optics = SweepOptics {
        wavelength: args.wavelength.unwrap_or(session.parameters.wavelength),
        dx: pitch,
        dy: pitch,
        scale_factor: args.scale,
    };
    let range = SweepRange {
        z_min: args.z_min,
        z_max: args.z_max,
        steps: args.steps,
    };

    let frame = load_frame(&args.file)?;
    println!("Loaded {} hologram", frame.size());
    println!(
        "Sweeping {} .. {} \u{00b5}m in {} steps ({})",
        range.z_min,
        range.z_max,
        range.steps,
        FocusMetric::from(args.metric)
    );
    println!();

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}%")?
            .progress_chars("=> "),
    );
    pb.set_message("Focus sweep");

    let steps = args.steps;
    let on_progress = |done: usize| pb.set_position((done * 100 / steps) as u64);
    let sweep = focus_sweep(
        &frame.to_field(),
        &range,
        &optics,
        args.metric.into(),
        Some(&on_progress),
    )?;
    pb.finish_with_message("Done");

    println!("\nBest focus:  z = {:.2} \u{00b5}m (step {})", sweep.best_z, sweep.best_index + 1);
    if args.curve {
        for (z, value) in &sweep.curve {
            println!("  {:>12.2}  {:.6e}", z, value);
        }
    }

    let exporter = Exporter::new(
        args.output.clone().unwrap_or(session.export.dir),
        args.format.map(Into::into).unwrap_or(session.export.format),
    )
    .context("Failed to prepare export directory")?;
    let amplitude = sweep.field.mapv(|v| v.norm());
    let path = exporter.export("focus", &normalize_to_u8(&amplitude))?;
    println!("Saved to {}", path.display());

    Ok(())
}
