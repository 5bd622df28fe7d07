//! Size-reduction pipeline
//!
//! Each strategy is a straight-line sequence over the injected engines. The
//! [`Compressor`] wraps them so that callers always get a usable file back.

mod gate;
mod orchestrator;
mod raster;
mod structural;

pub use gate::{size_gate, Gate};
pub use orchestrator::Compressor;
pub use raster::compress_raster;
pub use structural::compress_structural;

use crate::error::{CompressError, Result};

/// Tuning parameters must be finite and in (0, 1]
pub(crate) fn check_unit_range(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(CompressError::InvalidParameter { name, value })
    }
}
