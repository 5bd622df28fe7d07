use super::check_unit_range;
use crate::engine::{Engines, Rebuilt, StructuralOptions};
use crate::error::Result;

/// Re-serialize a document with structural optimizations.
///
/// At `quality == 1.0` only lossless changes are made; lower values also
/// re-encode embedded JPEG images at that quality.
pub fn compress_structural(engines: &Engines, bytes: &[u8], quality: f32) -> Result<Rebuilt> {
    check_unit_range("quality", quality)?;

    let options = StructuralOptions::for_quality(quality);
    log::debug!("Structural pass with {:?}", options);

    let rebuilt = engines.rebuilder.reserialize(bytes, &options)?;
    log::debug!(
        "Structural pass wrote {} pages in {} bytes (input {} bytes)",
        rebuilt.pages,
        rebuilt.bytes.len(),
        bytes.len()
    );
    Ok(rebuilt)
}
