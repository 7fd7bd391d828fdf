mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dlhm", about = "Digital lensless holographic microscopy toolkit")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show SER/image file metadata
    Info(commands::info::InfoArgs),
    /// Reconstruct a single hologram and export the result
    Reconstruct(commands::reconstruct::ReconstructArgs),
    /// Remove the reference tilt from an off-axis hologram
    Compensate(commands::compensate::CompensateArgs),
    /// Sweep propagation distances and keep the sharpest plane
    Focus(commands::focus::FocusArgs),
    /// Apply a filter chain to an image
    Filter(commands::filter::FilterArgs),
    /// Run the capture/reconstruct pipeline for a while
    Live(commands::live::LiveArgs),
    /// Print or save a default session config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Reconstruct(args) => commands::reconstruct::run(args),
        Commands::Compensate(args) => commands::compensate::run(args),
        Commands::Focus(args) => commands::focus::run(args),
        Commands::Filter(args) => commands::filter::run(args),
        Commands::Live(args) => commands::live::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
