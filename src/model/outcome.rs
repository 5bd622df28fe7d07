use serde::Serialize;

use crate::cli::Strategy;
use crate::error::{CompressError, FailureKind};

/// What happened to one compression attempt.
///
/// The caller always receives a usable file; this records whether it is the
/// candidate or the original, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Candidate was strictly smaller and was returned
    Compressed {
        original_len: usize,
        compressed_len: usize,
    },
    /// Candidate was not smaller; the original was returned
    Skipped {
        original_len: usize,
        candidate_len: usize,
    },
    /// An error occurred; the original was returned
    Failed { kind: FailureKind, reason: String },
}

impl Outcome {
    pub fn failed(err: &CompressError) -> Self {
        Outcome::Failed {
            kind: err.kind(),
            reason: err.to_string(),
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, Outcome::Compressed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// Structured result of one orchestrator call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionReport {
    pub file_name: String,
    pub strategy: Strategy,
    pub outcome: Outcome,
    /// Pages seen by the strategy, when it got far enough to count them
    pub pages: Option<usize>,
    pub input_len: usize,
    pub output_len: usize,
}

impl CompressionReport {
    /// Fraction of bytes saved (0.0 when nothing was saved)
    pub fn savings(&self) -> f64 {
        if self.input_len == 0 || self.output_len >= self.input_len {
            return 0.0;
        }
        1.0 - self.output_len as f64 / self.input_len as f64
    }
}
