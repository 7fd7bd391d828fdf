use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use console::Style;
use dlhm_core::io::export::Exporter;
use dlhm_core::io::image_io::frame_to_u8;
use dlhm_core::pipeline::{CaptureMessage, Pipeline, ReconstructionMessage, WorkerMonitor};
use dlhm_core::source::SourceKind;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::{load_session, AlgorithmArg, FormatArg, OpticsArgs, OutputModeArg};

#[derive(Args)]
pub struct LiveArgs {
    /// Session config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Replay a SER recording instead of the configured source
    #[arg(long, conflicts_with = "image")]
    pub ser: Option<PathBuf>,

    /// Serve a still image instead of the configured source
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Mirror captured frames left to right
    #[arg(long)]
    pub mirror: bool,

    /// Background image subtracted from every capture
    #[arg(long)]
    pub reference: Option<PathBuf>,

    #[command(flatten)]
    pub optics: OpticsArgs,

    /// Reconstruction algorithm
    #[arg(long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Rendered representation
    #[arg(long, value_enum)]
    pub mode: Option<OutputModeArg>,

    /// How long to run, in seconds
    #[arg(long, default_value = "5")]
    pub duration: f64,

    /// Do not export the last capture and reconstruction
    #[arg(long)]
    pub no_export: bool,

    /// Export directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export raster format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

pub fn run(args: &LiveArgs) -> Result<()> {
    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("--duration must be positive, got {}", args.duration);
    }
    let mut session = load_session(args.config.as_ref())?;
    if let Some(ref path) = args.ser {
        session.source.kind = SourceKind::Ser { path: path.clone() };
    }
    if let Some(ref path) = args.image {
        session.source.kind = SourceKind::Image { path: path.clone() };
    }
    session.source.mirror |= args.mirror;
    if args.reference.is_some() {
        session.source.reference = args.reference.clone();
    }
    args.optics.apply(&mut session.parameters);
    if let Some(algorithm) = args.algorithm {
        session.parameters.algorithm = algorithm.into();
    }
    if let Some(mode) = args.mode {
        session.parameters.output_mode = mode.into();
    }
    if let Some(ref dir) = args.output {
        session.export.dir = dir.clone();
    }
    if let Some(format) = args.format {
        session.export.format = format.into();
    }

    let duration = Duration::from_secs_f64(args.duration);
    crate::summary::print_session_summary(&session, duration);

    let pipeline = Pipeline::start(&session).context("Failed to start pipeline")?;
    let mut display = pipeline.display(&session);
    let tick = Duration::from_millis(session.display.tick_ms.max(1));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);

    let mut last_capture: Option<CaptureMessage> = None;
    let mut last_reconstruction: Option<ReconstructionMessage> = None;
    let mut captures = 0usize;
    let mut reconstructions = 0usize;

    let deadline = Instant::now() + duration;
    while Instant::now() < deadline {
        let update = display.tick();
        if let Some(msg) = update.capture {
            captures += 1;
            last_capture = Some(msg);
        }
        if let Some(msg) = update.reconstruction {
            reconstructions += 1;
            last_reconstruction = Some(msg);
        }
        spinner.set_message(format!(
            "capture {:>6.1} fps | reconstruction {:>6.1} fps",
            last_capture.as_ref().map_or(0.0, |m| m.fps),
            last_reconstruction.as_ref().map_or(0.0, |m| m.fps),
        ));
        spinner.tick();
        std::thread::sleep(tick);
    }
    spinner.finish_and_clear();

    info!(captures, reconstructions, "Live session finished");
    print_report(
        captures,
        reconstructions,
        pipeline.capture_monitor(),
        pipeline.reconstruct_monitor(),
    );
    pipeline.shutdown();

    if args.no_export {
        return Ok(());
    }
    let exporter = Exporter::new(&session.export.dir, session.export.format)
        .context("Failed to prepare export directory")?;
    if let Some(msg) = last_capture {
        let path = exporter.export("capture", &frame_to_u8(&msg.raw))?;
        println!("Saved to {}", path.display());
    }
    match last_reconstruction {
        Some(msg) => {
            let path = exporter.export("reconstruction", &msg.image)?;
            println!("Saved to {}", path.display());
        }
        None => println!("No reconstruction finished within {:.1} s", args.duration),
    }

    Ok(())
}

fn print_report(
    captures: usize,
    reconstructions: usize,
    capture: &WorkerMonitor,
    reconstruct: &WorkerMonitor,
) {
    let header = Style::new().cyan().bold();
    let label = Style::new().dim();
    let value = Style::new().bold().white();

    println!();
    println!("  {}", header.apply_to("Workers"));
    for (name, shown, monitor) in [
        ("Capture", captures, capture),
        ("Reconstruct", reconstructions, reconstruct),
    ] {
        println!(
            "    {:<14}{}",
            label.apply_to(name),
            value.apply_to(format!(
                "{} cycles, {} published, {} dropped, {} failed, {} displayed ({})",
                monitor.cycles(),
                monitor.published(),
                monitor.dropped(),
                monitor.failures(),
                shown,
                monitor.state()
            ))
        );
    }
    println!();
}
