use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dlhm_core::compensation::{compensate, TiltGeometry};
use dlhm_core::io::export::Exporter;
use dlhm_core::optics::Quadrant;

use super::{load_frame, load_session, FormatArg};

#[derive(Args)]
pub struct CompensateArgs {
    /// Off-axis hologram image or SER recording (first frame is used)
    pub file: PathBuf,

    /// Session config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Spectrum quadrant holding the sideband (1-4, counter-clockwise from top right)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub region: Option<u8>,

    /// Search grid spacing in spectrum pixels
    #[arg(long)]
    pub step: Option<f64>,

    /// Initial search half-width, in steps
    #[arg(long)]
    pub depth: Option<usize>,

    /// Wavelength in micrometres
    #[arg(long)]
    pub wavelength: Option<f64>,

    /// Horizontal pixel pitch in micrometres
    #[arg(long)]
    pub dx: Option<f64>,

    /// Vertical pixel pitch in micrometres (defaults to dx)
    #[arg(long)]
    pub dy: Option<f64>,

    /// Export directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export raster format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

pub fn run(args: &CompensateArgs) -> Result<()> {
    let session = load_session(args.config.as_ref())?;
    let mut config = session.compensation;
    if let Some(region) = args.region {
        config.region = Quadrant::from_index(region)?;
    }
    if let Some(step) = args.step {
        if !(step.is_finite() && step > 0.0) {
            anyhow::bail!("--step must be positive, got {step}");
        }
        config.step = step;
    }
    if let Some(depth) = args.depth {
        config.depth = depth;
    }

    let dx = args.dx.unwrap_or(session.parameters.pixel_pitch);
    let geometry = TiltGeometry {
        wavelength: args.wavelength.unwrap_or(session.parameters.wavelength),
        dx,
        dy: args.dy.unwrap_or(dx),
    };

    let frame = load_frame(&args.file)?;
    println!("Loaded {} hologram", frame.size());
    println!(
        "Searching quadrant {} (step {}, depth {})",
        config.region, config.step, config.depth
    );

    let result = compensate(&frame.data, &geometry, &config);

    println!("Carrier:     ({:.2}, {:.2})", result.fx, result.fy);
    println!(
        "Tilt:        ({:.4}\u{00b0}, {:.4}\u{00b0})",
        result.theta_x.to_degrees(),
        result.theta_y.to_degrees()
    );
    println!(
        "Score:       {} (start {}) after {} iteration(s)",
        result.score, result.initial_score, result.iterations
    );

    let exporter = Exporter::new(
        args.output.clone().unwrap_or(session.export.dir),
        args.format.map(Into::into).unwrap_or(session.export.format),
    )
    .context("Failed to prepare export directory")?;
    let (amplitude, phase) = exporter.export_field(&result.field)?;
    println!("Saved to {}", amplitude.display());
    println!("Saved to {}", phase.display());

    Ok(())
}
