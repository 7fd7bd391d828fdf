use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dlhm_core::filters::apply_filter_chain;
use dlhm_core::filters::levels::normalize_to_u8;
use dlhm_core::frame::Frame;
use dlhm_core::io::export::Exporter;
use dlhm_core::optics::MaskCache;
use dlhm_core::reconstruction::{reconstruct_frame, render_output, Reconstruction};

use super::{load_frame, load_session, AlgorithmArg, FormatArg, OpticsArgs, OutputModeArg};

#[derive(Args)]
pub struct ReconstructArgs {
    /// Hologram image or SER recording (first frame is used)
    pub file: PathBuf,

    /// Session config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub optics: OpticsArgs,

    /// Reconstruction algorithm
    #[arg(long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Rendered representation
    #[arg(long, value_enum)]
    pub mode: Option<OutputModeArg>,

    /// Background image subtracted before reconstruction
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Also export amplitude and phase of the complex field
    #[arg(long)]
    pub field: bool,

    /// Export directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export raster format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

pub fn run(args: &ReconstructArgs) -> Result<()> {
    let session = load_session(args.config.as_ref())?;
    let mut params = session.parameters;
    args.optics.apply(&mut params);
    if let Some(algorithm) = args.algorithm {
        params.algorithm = algorithm.into();
    }
    if let Some(mode) = args.mode {
        params.output_mode = mode.into();
    }
    params.validate()?;

    let mut frame = load_frame(&args.file)?;
    println!("Loaded {} hologram", frame.size());
    if let Some(ref path) = args.reference {
        frame = frame.subtract_reference(&load_frame(path)?);
    }
    let frame = apply_filter_chain(&frame, &session.capture_filters);

    crate::summary::print_reconstruction_summary(&params, &session.reconstruction_filters);

    let mask = MaskCache::new().get(params.cosine_period, frame.size());
    let reconstruction = reconstruct_frame(&frame, &params, &mask);
    let unit = render_output(&reconstruction, params.output_mode);
    let rendered = apply_filter_chain(&Frame::new(unit, 8), &session.reconstruction_filters);

    let exporter = Exporter::new(
        args.output.clone().unwrap_or(session.export.dir),
        args.format.map(Into::into).unwrap_or(session.export.format),
    )
    .context("Failed to prepare export directory")?;
    let path = exporter.export("reconstruction", &normalize_to_u8(&rendered.data))?;
    println!("Saved to {}", path.display());

    if args.field {
        match reconstruction {
            Reconstruction::Field(ref field) => {
                let (amplitude, phase) = exporter.export_field(field)?;
                println!("Saved to {}", amplitude.display());
                println!("Saved to {}", phase.display());
            }
            Reconstruction::Intensity(_) => {
                println!("Kreuzer yields intensity only, skipping field export");
            }
        }
    }

    Ok(())
}
