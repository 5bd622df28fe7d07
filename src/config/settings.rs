use crate::cli::{Args, Strategy};

use super::defaults::*;

/// Runtime settings for a compression run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub strategy: Strategy,

    /// Structural quality in (0, 1]. Below 1.0, embedded JPEGs are re-encoded.
    pub quality: f32,

    /// Raster scale factor in (0, 1]
    pub scale: f32,

    /// JPEG quality for rasterized pages
    pub raster_jpeg_quality: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Structural,
            quality: DEFAULT_QUALITY,
            scale: DEFAULT_SCALE,
            raster_jpeg_quality: RASTER_JPEG_QUALITY,
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_args(args: &Args) -> Self {
        Self {
            strategy: args.strategy,
            quality: args.quality,
            scale: args.scale,
            ..Default::default()
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}
