use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dlhm_core::io::image_io::load_image;
use dlhm_core::io::ser::SerReader;

#[derive(Args)]
pub struct InfoArgs {
    /// Input SER recording or raster image
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let is_ser = args
        .file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ser"));
    if !is_ser {
        let frame = load_image(&args.file)
            .with_context(|| format!("Failed to load {}", args.file.display()))?;
        println!("File:        {}", args.file.display());
        println!("Dimensions:  {}", frame.size());
        println!("Bit depth:   {}", frame.original_bit_depth);
        if !frame.size().is_square() {
            println!("Note:        non-square, Kreuzer pads to a square");
        }
        return Ok(());
    }

    let reader = SerReader::open(&args.file)?;
    let info = reader.source_info(&args.file);

    println!("File:        {}", info.filename.display());
    println!("Frames:      {}", info.total_frames);
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Bit depth:   {}", info.bit_depth);
    println!("Planes:      {}", reader.header.planes());

    if let Some(ref obs) = info.observer {
        println!("Observer:    {}", obs);
    }
    if let Some(ref inst) = info.instrument {
        println!("Instrument:  {}", inst);
    }

    if let Some(frame_bytes) = reader.header.frame_byte_size() {
        let total_mb = (frame_bytes * info.total_frames) as f64 / (1024.0 * 1024.0);
        println!("Data size:   {:.1} MB", total_mb);
    }

    Ok(())
}
