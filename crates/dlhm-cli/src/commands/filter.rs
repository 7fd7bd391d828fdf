use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dlhm_core::filters::{apply_filter_chain, FilterStep};
use dlhm_core::io::image_io::{load_image, save_image, save_tiff16, RasterFormat};

use super::load_session;

#[derive(Args)]
pub struct FilterArgs {
    /// Input image file (TIFF, PNG or BMP)
    pub file: PathBuf,

    /// Session config whose capture filter chain runs first
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Gamma exponent (e.g. 0.8)
    #[arg(long)]
    pub gamma: Option<f32>,

    /// Gain applied together with --gamma
    #[arg(long, default_value = "1.0")]
    pub gain: f32,

    /// Brightness offset (-1.0 to 1.0)
    #[arg(long)]
    pub brightness: Option<f32>,

    /// Contrast factor (1.0 = no change)
    #[arg(long)]
    pub contrast: Option<f32>,

    /// Adaptive histogram equalization with this many tiles per side
    #[arg(long)]
    pub equalize: Option<usize>,

    /// Clip limit for --equalize
    #[arg(long, default_value = "2.0")]
    pub clip_limit: f32,

    /// High-pass cutoff as a fraction of the spectrum radius
    #[arg(long)]
    pub high_pass: Option<f32>,

    /// Low-pass cutoff as a fraction of the spectrum radius
    #[arg(long)]
    pub low_pass: Option<f32>,

    /// Output file path
    #[arg(short, long, default_value = "filtered.png")]
    pub output: PathBuf,
}

pub fn run(args: &FilterArgs) -> Result<()> {
    let frame = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    println!("Loaded {} image", frame.size());

    let mut steps = load_session(args.config.as_ref())?.capture_filters;
    steps.extend(steps_from_args(args));
    if steps.is_empty() {
        anyhow::bail!("No filter requested");
    }
    for (i, step) in steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    let filtered = apply_filter_chain(&frame, &steps);
    match RasterFormat::from_path(&args.output) {
        Some(RasterFormat::Tiff) => save_tiff16(&filtered, &args.output)?,
        _ => save_image(&filtered, &args.output)?,
    }
    println!("Saved to {}", args.output.display());

    Ok(())
}

fn steps_from_args(args: &FilterArgs) -> Vec<FilterStep> {
    let mut steps = Vec::new();
    if let Some(gamma) = args.gamma {
        steps.push(FilterStep::Gamma {
            gamma,
            gain: args.gain,
        });
    }
    if args.brightness.is_some() || args.contrast.is_some() {
        steps.push(FilterStep::Contrast {
            brightness: args.brightness.unwrap_or(0.0),
            contrast: args.contrast.unwrap_or(1.0),
        });
    }
    if let Some(tiles) = args.equalize {
        steps.push(FilterStep::AdaptiveEqualization {
            tiles,
            clip_limit: args.clip_limit,
        });
    }
    if let Some(cutoff) = args.high_pass {
        steps.push(FilterStep::HighPass { cutoff });
    }
    if let Some(cutoff) = args.low_pass {
        steps.push(FilterStep::LowPass { cutoff });
    }
    steps
}
