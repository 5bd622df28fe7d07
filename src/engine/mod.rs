//! Document engines driven by the compressor
//!
//! Decoding, rendering, image encoding and document writing are black-box
//! capabilities behind the traits below. The compressor only sequences them,
//! so any engine can be swapped for another backend or a test double.

mod jpeg;
mod lopdf_backend;
#[cfg(feature = "pdfium")]
mod pdfium_backend;

use image::RgbImage;

use crate::error::Result;
use crate::model::{PageSize, Viewport};

pub use jpeg::{jpeg_quality, recompress_embedded_jpegs, JpegPageEncoder};
pub use lopdf_backend::{page_size_of, LopdfLoader, LopdfRebuilder};
#[cfg(feature = "pdfium")]
pub use pdfium_backend::PdfiumLoader;

/// Opens raw bytes as a paged document.
pub trait DocumentLoader {
    /// Fails with `CompressError::Decode` when the bytes are not a usable PDF.
    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn LoadedDocument + 'a>>;
}

/// A decoded document. Page indices are zero-based.
pub trait LoadedDocument {
    fn page_count(&self) -> usize;

    /// Intrinsic page size in points, rotation applied
    fn page_size(&self, index: usize) -> Result<PageSize>;

    /// Render a page into a buffer of exactly `viewport.pixel_size()` pixels.
    ///
    /// Fails with `CompressError::RenderSurface` when no render target can be
    /// acquired for the page.
    fn render_page(&self, index: usize, viewport: Viewport) -> Result<RgbImage>;
}

/// Lossy image encoding of rendered pages
pub trait ImageEncoder {
    /// `quality` is in (0, 1]
    fn encode(&self, pixels: &RgbImage, quality: f32) -> std::result::Result<RasterImage, String>;
}

/// Writes documents back to bytes
pub trait DocumentRebuilder {
    /// Decode `bytes` and write them back with structural optimizations
    fn reserialize(&self, bytes: &[u8], options: &StructuralOptions) -> Result<Rebuilt>;

    /// Build a new document with one full-page image per entry, in order
    fn assemble(&self, pages: &[RasterPage]) -> Result<Vec<u8>>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorModel {
    Rgb,
    Gray,
}

impl ColorModel {
    pub fn pdf_color_space(&self) -> &'static str {
        match self {
            ColorModel::Rgb => "DeviceRGB",
            ColorModel::Gray => "DeviceGray",
        }
    }
}

/// An encoded JPEG snapshot of a page
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub color: ColorModel,
}

/// A rasterized page ready to be placed in a rebuilt document
#[derive(Debug, Clone, PartialEq)]
pub struct RasterPage {
    pub viewport: Viewport,
    pub image: RasterImage,
}

/// Options for structural re-serialization.
///
/// Unreachable objects are always pruned and unfiltered streams always
/// compressed; only image re-encoding is optional.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StructuralOptions {
    /// Re-encode embedded JPEGs at this quality when set
    pub image_quality: Option<f32>,
}

impl StructuralOptions {
    /// Image re-encoding only below 1.0
    pub fn for_quality(quality: f32) -> Self {
        Self {
            image_quality: (quality < 1.0).then_some(quality),
        }
    }
}

/// Bytes written by a rebuilder along with the page count it saw
#[derive(Debug, Clone, PartialEq)]
pub struct Rebuilt {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// The set of engines a compressor drives
pub struct Engines {
    pub loader: Box<dyn DocumentLoader>,
    pub encoder: Box<dyn ImageEncoder>,
    pub rebuilder: Box<dyn DocumentRebuilder>,
}

impl Engines {
    /// lopdf for decoding and writing; pages cannot be rendered
    pub fn lopdf_only() -> Self {
        Self {
            loader: Box::new(LopdfLoader),
            encoder: Box::new(JpegPageEncoder),
            rebuilder: Box::new(LopdfRebuilder),
        }
    }

    /// PDFium for decoding and rendering, lopdf for writing
    #[cfg(feature = "pdfium")]
    pub fn with_pdfium() -> Result<Self> {
        Ok(Self {
            loader: Box::new(PdfiumLoader::bind()?),
            ..Self::lopdf_only()
        })
    }

    /// Best engines available in this build and on this machine
    pub fn detect() -> Self {
        #[cfg(feature = "pdfium")]
        {
            match Self::with_pdfium() {
                Ok(engines) => return engines,
                Err(e) => log::warn!("PDFium unavailable, raster strategy disabled: {}", e),
            }
        }
        Self::lopdf_only()
    }

    pub fn with_loader(mut self, loader: impl DocumentLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_encoder(mut self, encoder: impl ImageEncoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    pub fn with_rebuilder(mut self, rebuilder: impl DocumentRebuilder + 'static) -> Self {
        self.rebuilder = Box::new(rebuilder);
        self
    }
}

impl Default for Engines {
    fn default() -> Self {
        Self::detect()
    }
}
