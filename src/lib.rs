pub mod cli;
pub mod compress;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;

pub use cli::Strategy;
pub use compress::Compressor;
pub use config::Settings;
pub use engine::Engines;
pub use error::{CompressError, FailureKind};
pub use model::{CompressionReport, Outcome, PdfFile};

/// High-level API for shrinking one PDF file.
///
/// This is the recommended entry point for library consumers. It picks the
/// best engines available, runs the strategy from `settings`, and never
/// fails: when compression is not possible or does not help, the returned
/// file carries the original bytes and the report says why.
///
/// # Example
///
/// ```no_run
/// use pdf_squeeze::{compress_file, PdfFile, Settings, Strategy};
///
/// let bytes = std::fs::read("upload.pdf").unwrap();
/// let file = PdfFile::new("upload.pdf", bytes);
///
/// let settings = Settings::default().with_strategy(Strategy::Raster).with_scale(0.8);
/// let (smaller, report) = compress_file(&file, &settings);
///
/// assert!(smaller.len() <= file.len());
/// println!("{:?}", report.outcome);
/// ```
pub fn compress_file(file: &PdfFile, settings: &Settings) -> (PdfFile, CompressionReport) {
    Compressor::new(Engines::detect())
        .with_raster_jpeg_quality(settings.raster_jpeg_quality)
        .compress(file, settings)
}
