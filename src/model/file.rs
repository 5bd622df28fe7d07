use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

use crate::config::defaults::PDF_CONTENT_TYPE;
use crate::error::Result;

/// A named PDF file, as handed over by the upload flow.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfFile {
    /// Logical file name (no directory component)
    pub name: String,
    pub content: Vec<u8>,
    pub modified: DateTime<Utc>,
}

impl PdfFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
            modified: Utc::now(),
        }
    }

    /// Read a file from disk, keeping only its file name as the logical name
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, content))
    }

    /// Same name and content type, new bytes, fresh timestamp
    pub fn with_content(&self, content: Vec<u8>) -> Self {
        Self::new(self.name.clone(), content)
    }

    pub fn content_type(&self) -> &'static str {
        PDF_CONTENT_TYPE
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
