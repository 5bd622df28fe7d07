use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::defaults::{DEFAULT_QUALITY, DEFAULT_SCALE, OUTPUT_SUFFIX};

#[derive(Parser, Debug)]
#[command(name = "pdf-squeeze")]
#[command(
    author,
    version,
    about = "Shrink PDF files by structural re-serialization or page rasterization"
)]
pub struct Args {
    /// Input PDF file paths
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path (single input only)
    #[arg(short, long, conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Directory for output files (defaults to each input's directory)
    #[arg(short = 'd', long)]
    pub out_dir: Option<PathBuf>,

    /// Compression strategy
    #[arg(short, long, value_enum, default_value = "structural")]
    pub strategy: Strategy,

    /// Structural quality in (0, 1]; below 1 re-encodes embedded JPEG images
    #[arg(short, long, default_value_t = DEFAULT_QUALITY)]
    pub quality: f32,

    /// Raster scale factor in (0, 1]
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    pub scale: f32,

    /// Print a JSON report per input on stdout
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Size-reduction strategy
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Re-serialize the document with structural optimizations
    #[default]
    Structural,
    /// Render every page to a JPEG and rebuild the document from the images
    Raster,
    /// Run both strategies and keep the smallest result
    Best,
}

impl Args {
    /// Get the output path for an input file
    ///
    /// `--output` wins, then `--out-dir`, then `<stem>-compressed.pdf` beside the input.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        if let Some(ref output) = self.output {
            return output.clone();
        }

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let file_name = format!("{}{}.pdf", stem, OUTPUT_SUFFIX);

        match self.out_dir {
            Some(ref dir) => dir.join(file_name),
            None => input.with_file_name(file_name),
        }
    }

    /// Check that `--output` is only used with a single input and that no two
    /// inputs write to the same file
    pub fn validate(&self) -> Result<(), String> {
        if self.output.is_some() && self.inputs.len() > 1 {
            return Err(format!(
                "--output accepts a single input, got {}; use --out-dir instead",
                self.inputs.len()
            ));
        }

        let mut targets: HashMap<PathBuf, &Path> = HashMap::new();
        for input in &self.inputs {
            if let Some(previous) = targets.insert(self.output_path(input), input) {
                return Err(format!(
                    "{} and {} would both be written to {}",
                    previous.display(),
                    input.display(),
                    self.output_path(input).display()
                ));
            }
        }
        Ok(())
    }
}
