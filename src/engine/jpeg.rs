//! JPEG encoding for rasterized pages and embedded images

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object};

use super::{ColorModel, ImageEncoder, RasterImage};

/// Encodes rendered pages as baseline RGB JPEGs
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegPageEncoder;

impl ImageEncoder for JpegPageEncoder {
    fn encode(&self, pixels: &RgbImage, quality: f32) -> Result<RasterImage, String> {
        let mut data = Vec::new();
        JpegEncoder::new_with_quality(&mut data, jpeg_quality(quality))
            .encode_image(pixels)
            .map_err(|e| format!("JPEG encoding failed: {}", e))?;

        Ok(RasterImage {
            data,
            width: pixels.width(),
            height: pixels.height(),
            color: ColorModel::Rgb,
        })
    }
}

/// Map a (0, 1] quality onto the encoder's 1-100 scale
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Re-encode embedded JPEG images at `quality`, keeping each one only if smaller.
///
/// Returns the number of images replaced. Images that cannot be decoded are
/// left as they are.
pub fn recompress_embedded_jpegs(doc: &mut Document, quality: f32) -> usize {
    let mut replaced = 0;

    for (id, object) in doc.objects.iter_mut() {
        let Object::Stream(stream) = object else {
            continue;
        };
        let Some(color) = recompressible_color(&stream.dict) else {
            continue;
        };

        match reencode(&stream.content, color, quality) {
            Ok(data) if data.len() < stream.content.len() => {
                log::debug!(
                    "Image {:?}: {} -> {} bytes",
                    id,
                    stream.content.len(),
                    data.len()
                );
                stream.set_content(data);
                replaced += 1;
            }
            Ok(_) => log::debug!("Image {:?} not smaller after re-encoding", id),
            Err(e) => log::debug!("Skipping image {:?}: {}", id, e),
        }
    }

    replaced
}

fn name_of<'a>(dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    dict.get(key).ok().and_then(|o| o.as_name().ok())
}

/// Baseline 8-bit RGB or gray DCT images with no decode remapping.
///
/// Images carrying `/DecodeParms` are skipped: `/ColorTransform` changes how
/// the samples are stored and the codec would not preserve it.
fn recompressible_color(dict: &Dictionary) -> Option<ColorModel> {
    if name_of(dict, b"Subtype") != Some(&b"Image"[..])
        || dict.has(b"Decode")
        || dict.has(b"DecodeParms")
    {
        return None;
    }

    let is_dct = match dict.get(b"Filter").ok()? {
        Object::Name(name) => name == b"DCTDecode",
        Object::Array(filters) => {
            filters.len() == 1 && filters[0].as_name().ok() == Some(&b"DCTDecode"[..])
        }
        _ => false,
    };
    if !is_dct {
        return None;
    }

    match dict.get(b"BitsPerComponent").ok()? {
        Object::Integer(8) => {}
        _ => return None,
    }

    match name_of(dict, b"ColorSpace")? {
        b"DeviceRGB" => Some(ColorModel::Rgb),
        b"DeviceGray" => Some(ColorModel::Gray),
        _ => None,
    }
}

fn reencode(data: &[u8], color: ColorModel, quality: f32) -> Result<Vec<u8>, String> {
    let decoded = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
        .map_err(|e| format!("decode failed: {}", e))?;
    let mut out = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut out, jpeg_quality(quality));
        let encoded = match (color, &decoded) {
            (ColorModel::Gray, DynamicImage::ImageLuma8(gray)) => encoder.encode_image(gray),
            (ColorModel::Rgb, DynamicImage::ImageRgb8(rgb)) => encoder.encode_image(rgb),
            _ => {
                return Err(format!(
                    "decoded as {:?}, dictionary says {}",
                    decoded.color(),
                    color.pdf_color_space()
                ))
            }
        };
        encoded.map_err(|e| format!("encode failed: {}", e))?;
    }

    Ok(out)
}
