use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("Failed to decode PDF: {0}")]
    Decode(String),

    #[error("Failed to render page {page}: {message}")]
    RenderSurface { page: usize, message: String },

    #[error("Failed to encode page {page}: {message}")]
    Encode { page: usize, message: String },

    #[error("Invalid {name}: {value} (expected a value in (0, 1])")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`CompressError`], carried in reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Decode,
    RenderSurface,
    Encode,
    InvalidParameter,
    Unexpected,
}

impl CompressError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CompressError::Decode(_) => FailureKind::Decode,
            CompressError::RenderSurface { .. } => FailureKind::RenderSurface,
            CompressError::Encode { .. } => FailureKind::Encode,
            CompressError::InvalidParameter { .. } => FailureKind::InvalidParameter,
            CompressError::Unexpected(_) | CompressError::Io(_) => FailureKind::Unexpected,
        }
    }
}

impl From<lopdf::Error> for CompressError {
    fn from(err: lopdf::Error) -> Self {
        CompressError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CompressError>;
