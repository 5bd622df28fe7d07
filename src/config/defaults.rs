/// Default raster scale factor applied to each page's size in points
pub const DEFAULT_SCALE: f32 = 0.8;

/// Default structural quality (1.0 = lossless optimizations only)
pub const DEFAULT_QUALITY: f32 = 1.0;

/// JPEG quality used for rasterized pages (0.0-1.0)
pub const RASTER_JPEG_QUALITY: f32 = 0.85;

/// Media box assumed for pages that declare none (US Letter, in points)
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Content type of every file handled by this crate
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Suffix appended to the input stem when no output path is given
pub const OUTPUT_SUFFIX: &str = "-compressed";
