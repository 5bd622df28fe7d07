use super::check_unit_range;
use crate::engine::{Engines, RasterPage, Rebuilt};
use crate::error::{CompressError, Result};

/// Rasterize every page at `scale` and rebuild the document from JPEGs.
///
/// Pages are processed one at a time in document order. Any page failure
/// aborts the whole strategy; no partial document is produced.
pub fn compress_raster(
    engines: &Engines,
    bytes: &[u8],
    scale: f32,
    jpeg_quality: f32,
) -> Result<Rebuilt> {
    check_unit_range("scale", scale)?;
    check_unit_range("jpeg quality", jpeg_quality)?;

    let document = engines.loader.load(bytes)?;
    let page_count = document.page_count();
    if page_count == 0 {
        return Err(CompressError::Decode("document has no pages".to_string()));
    }

    let mut pages = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let page_number = index + 1;
        let viewport = document.page_size(index)?.viewport(scale);

        let pixels = document.render_page(index, viewport)?;
        if pixels.dimensions() != viewport.pixel_size() {
            return Err(CompressError::RenderSurface {
                page: page_number,
                message: format!(
                    "renderer returned {:?}, expected {:?}",
                    pixels.dimensions(),
                    viewport.pixel_size()
                ),
            });
        }

        let image = engines
            .encoder
            .encode(&pixels, jpeg_quality)
            .map_err(|message| CompressError::Encode {
                page: page_number,
                message,
            })?;
        log::debug!(
            "Page {}/{}: {}x{} px, {} bytes",
            page_number,
            page_count,
            image.width,
            image.height,
            image.data.len()
        );

        pages.push(RasterPage { viewport, image });
    }

    let bytes = engines.rebuilder.assemble(&pages)?;
    Ok(Rebuilt {
        bytes,
        pages: page_count,
    })
}
