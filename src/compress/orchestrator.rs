use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::gate::{size_gate, Gate};
use super::raster::compress_raster;
use super::structural::compress_structural;
use crate::cli::Strategy;
use crate::config::defaults::RASTER_JPEG_QUALITY;
use crate::config::Settings;
use crate::engine::{Engines, Rebuilt};
use crate::error::{CompressError, Result};
use crate::model::{CompressionReport, Outcome, PdfFile};

/// Fail-open front end over the size-reduction strategies.
///
/// Every entry point returns a file no larger than its input. Failures are
/// logged and reported in the [`CompressionReport`] but never returned as
/// errors: the caller gets the original content back instead.
pub struct Compressor {
    engines: Engines,
    raster_jpeg_quality: f32,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(Engines::default())
    }
}

impl Compressor {
    pub fn new(engines: Engines) -> Self {
        Self {
            engines,
            raster_jpeg_quality: RASTER_JPEG_QUALITY,
        }
    }

    pub fn with_raster_jpeg_quality(mut self, quality: f32) -> Self {
        self.raster_jpeg_quality = quality;
        self
    }

    /// Run the strategy selected in `settings`
    pub fn compress(&self, file: &PdfFile, settings: &Settings) -> (PdfFile, CompressionReport) {
        match settings.strategy {
            Strategy::Structural => self.compress_structural_with_report(file, settings.quality),
            Strategy::Raster => self.compress_raster_with_report(file, settings.scale),
            Strategy::Best => self.compress_best_with_report(file, settings.quality, settings.scale),
        }
    }

    pub fn compress_structural(&self, file: &PdfFile, quality: f32) -> PdfFile {
        self.compress_structural_with_report(file, quality).0
    }

    pub fn compress_structural_with_report(
        &self,
        file: &PdfFile,
        quality: f32,
    ) -> (PdfFile, CompressionReport) {
        let result = self.attempt(|| compress_structural(&self.engines, &file.content, quality));
        self.finish(file, Strategy::Structural, result)
    }

    pub fn compress_raster(&self, file: &PdfFile, scale: f32) -> PdfFile {
        self.compress_raster_with_report(file, scale).0
    }

    pub fn compress_raster_with_report(
        &self,
        file: &PdfFile,
        scale: f32,
    ) -> (PdfFile, CompressionReport) {
        let result = self.attempt(|| {
            compress_raster(
                &self.engines,
                &file.content,
                scale,
                self.raster_jpeg_quality,
            )
        });
        self.finish(file, Strategy::Raster, result)
    }

    pub fn compress_best(&self, file: &PdfFile, quality: f32, scale: f32) -> PdfFile {
        self.compress_best_with_report(file, quality, scale).0
    }

    /// Run both strategies on the original and keep the smaller candidate
    pub fn compress_best_with_report(
        &self,
        file: &PdfFile,
        quality: f32,
        scale: f32,
    ) -> (PdfFile, CompressionReport) {
        let structural =
            self.attempt(|| compress_structural(&self.engines, &file.content, quality));
        let raster = self.attempt(|| {
            compress_raster(
                &self.engines,
                &file.content,
                scale,
                self.raster_jpeg_quality,
            )
        });

        let result = match (structural, raster) {
            (Ok(s), Ok(r)) => {
                log::debug!(
                    "{}: structural {} bytes, raster {} bytes",
                    file.name,
                    s.bytes.len(),
                    r.bytes.len()
                );
                Ok(if r.bytes.len() < s.bytes.len() { r } else { s })
            }
            (Ok(s), Err(e)) => {
                log::info!("{}: raster strategy unavailable: {}", file.name, e);
                Ok(s)
            }
            (Err(e), Ok(r)) => {
                log::info!("{}: structural strategy unavailable: {}", file.name, e);
                Ok(r)
            }
            (Err(s), Err(r)) => Err(combine(s, r)),
        };
        self.finish(file, Strategy::Best, result)
    }

    /// Run one strategy, turning a panic inside an engine into an error
    fn attempt<F>(&self, run: F) -> Result<Rebuilt>
    where
        F: FnOnce() -> Result<Rebuilt>,
    {
        panic::catch_unwind(AssertUnwindSafe(run))
            .unwrap_or_else(|payload| Err(CompressError::Unexpected(panic_message(&*payload))))
    }

    fn finish(
        &self,
        file: &PdfFile,
        strategy: Strategy,
        result: Result<Rebuilt>,
    ) -> (PdfFile, CompressionReport) {
        let input_len = file.len();

        let (output, outcome, pages) = match result {
            Ok(rebuilt) => {
                let gate = size_gate(&file.content, rebuilt.bytes);
                let outcome = gate.outcome(input_len);
                let output = match gate {
                    Gate::Accepted(bytes) => {
                        log::info!(
                            "{}: {} -> {} bytes ({:?})",
                            file.name,
                            input_len,
                            bytes.len(),
                            strategy
                        );
                        file.with_content(bytes)
                    }
                    Gate::Rejected { candidate_len } => {
                        log::info!(
                            "{}: {:?} result is {} bytes, not smaller than {}; keeping original",
                            file.name,
                            strategy,
                            candidate_len,
                            input_len
                        );
                        file.with_content(file.content.clone())
                    }
                };
                (output, outcome, Some(rebuilt.pages))
            }
            Err(err) => {
                log::warn!(
                    "{}: {:?} compression failed, keeping original: {}",
                    file.name,
                    strategy,
                    err
                );
                (
                    file.with_content(file.content.clone()),
                    Outcome::failed(&err),
                    None,
                )
            }
        };

        let report = CompressionReport {
            file_name: file.name.clone(),
            strategy,
            outcome,
            pages,
            input_len,
            output_len: output.len(),
        };
        (output, report)
    }
}

fn combine(structural: CompressError, raster: CompressError) -> CompressError {
    match structural {
        // Both strategies decode the same bytes; report the shared cause as is
        CompressError::Decode(_) | CompressError::InvalidParameter { .. } => structural,
        _ => CompressError::Unexpected(format!(
            "structural: {}; raster: {}",
            structural, raster
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("engine panicked: {}", detail)
}
