//! Page geometry in PDF points and its scaled raster viewport

use crate::config::defaults::{DEFAULT_PAGE_HEIGHT_PT, DEFAULT_PAGE_WIDTH_PT};

/// Intrinsic page size in PDF points (1/72 inch)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn viewport(&self, scale: f32) -> Viewport {
        Viewport {
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT)
    }
}

/// A page size scaled for rendering.
///
/// One viewport unit is one pixel of the render target and one point of the
/// rebuilt page, so the rebuilt page keeps the viewport's fractional size while
/// the pixel buffer is truncated to whole pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Pixel dimensions of the render target (never zero)
    pub fn pixel_size(&self) -> (u32, u32) {
        (to_pixels(self.width), to_pixels(self.height))
    }
}

fn to_pixels(v: f32) -> u32 {
    if v.is_finite() && v >= 1.0 {
        v.floor() as u32
    } else {
        1
    }
}
