use anyhow::{Context, Result};
use clap::Parser;
use std::fs;

use pdf_squeeze::cli::Args;
use pdf_squeeze::config::Settings;
use pdf_squeeze::engine::Engines;
use pdf_squeeze::{Compressor, Outcome, PdfFile};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    args.validate().map_err(|e| anyhow::anyhow!(e))?;

    if let Some(ref dir) = args.out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let settings = Settings::from_args(&args);
    let compressor =
        Compressor::new(Engines::detect()).with_raster_jpeg_quality(settings.raster_jpeg_quality);

    log::info!(
        "Processing {} files with {:?} strategy",
        args.inputs.len(),
        settings.strategy
    );

    for input in &args.inputs {
        let file = PdfFile::from_path(input)
            .with_context(|| format!("Failed to read input file: {}", input.display()))?;

        let (output, report) = compressor.compress(&file, &settings);

        let output_path = args.output_path(input);
        fs::write(&output_path, &output.content)
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

        if args.json {
            println!("{}", serde_json::to_string(&report)?);
            continue;
        }

        match report.outcome {
            Outcome::Compressed { .. } => println!(
                "{}: {} -> {} bytes ({:.1}% smaller), wrote {}",
                input.display(),
                report.input_len,
                report.output_len,
                report.savings() * 100.0,
                output_path.display()
            ),
            Outcome::Skipped { candidate_len, .. } => println!(
                "{}: no reduction ({} bytes candidate), wrote original to {}",
                input.display(),
                candidate_len,
                output_path.display()
            ),
            Outcome::Failed { ref reason, .. } => println!(
                "{}: compression failed ({}), wrote original to {}",
                input.display(),
                reason,
                output_path.display()
            ),
        }
    }

    Ok(())
}
