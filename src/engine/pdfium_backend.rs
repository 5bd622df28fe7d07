//! PDFium-backed decoding and page rendering
//!
//! PDFium is bound at runtime. The library is searched in the working
//! directory, then `./vendor/pdfium/lib/`, then the system library paths.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};
use pdfium_render::prelude::*;

use super::{DocumentLoader, LoadedDocument};
use crate::error::{CompressError, Result};
use crate::model::{PageSize, Viewport};

pub struct PdfiumLoader {
    pdfium: Pdfium,
}

impl PdfiumLoader {
    pub fn bind() -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                    "./vendor/pdfium/lib/",
                ))
            })
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| {
                CompressError::Unexpected(format!("Failed to load PDFium library: {:?}", e))
            })?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl DocumentLoader for PdfiumLoader {
    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn LoadedDocument + 'a>> {
        if bytes.is_empty() {
            return Err(CompressError::Decode("empty input".to_string()));
        }
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| CompressError::Decode(format!("{:?}", e)))?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

impl PdfiumDocument<'_> {
    fn page(&self, index: usize) -> Result<PdfPage<'_>> {
        let page_index = index.try_into().map_err(|_| CompressError::RenderSurface {
            page: index + 1,
            message: "page index out of range".to_string(),
        })?;
        self.document
            .pages()
            .get(page_index)
            .map_err(|e| CompressError::RenderSurface {
                page: index + 1,
                message: format!("{:?}", e),
            })
    }
}

impl LoadedDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<PageSize> {
        let page = self.page(index)?;
        Ok(PageSize::new(page.width().value, page.height().value))
    }

    fn render_page(&self, index: usize, viewport: Viewport) -> Result<RgbImage> {
        let page = self.page(index)?;
        let (width, height) = viewport.pixel_size();
        let surface_error = |message: String| CompressError::RenderSurface {
            page: index + 1,
            message,
        };

        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| surface_error(format!("{:?}", e)))?;

        let rgba = RgbaImage::from_raw(
            bitmap.width() as u32,
            bitmap.height() as u32,
            bitmap.as_rgba_bytes(),
        )
        .ok_or_else(|| surface_error("bitmap size does not match its buffer".to_string()))?;
        let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

        // PDFium keeps the aspect ratio when fitting both target sides
        if rgb.dimensions() == (width, height) {
            Ok(rgb)
        } else {
            Ok(imageops::resize(&rgb, width, height, FilterType::Triangle))
        }
    }
}
