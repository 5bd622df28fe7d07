//! lopdf-backed decoding and document writing
//!
//! lopdf understands the object structure of a PDF but has no renderer, so
//! [`LopdfLoader`] can report page geometry while refusing to rasterize.

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::jpeg::recompress_embedded_jpegs;
use super::{
    DocumentLoader, DocumentRebuilder, LoadedDocument, RasterPage, Rebuilt, StructuralOptions,
};
use crate::error::{CompressError, Result};
use crate::model::{PageSize, Viewport};

/// Page tree depth beyond which inherited attributes are not looked up
const MAX_TREE_DEPTH: usize = 32;

/// Resource name of the page image in rebuilt documents
const PAGE_IMAGE_NAME: &str = "Im0";

pub(crate) fn load_document(bytes: &[u8]) -> Result<Document> {
    if bytes.is_empty() {
        return Err(CompressError::Decode("empty input".to_string()));
    }
    let doc = Document::load_mem(bytes)?;
    // lopdf leaves encrypted streams as they are; rewriting them corrupts the file
    if doc.trailer.has(b"Encrypt") {
        return Err(CompressError::Decode(
            "encrypted documents are not supported".to_string(),
        ));
    }
    Ok(doc)
}

fn save_document(doc: &mut Document, capacity: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(capacity);
    doc.save_to(&mut output)
        .map_err(|e| CompressError::Unexpected(format!("Failed to save PDF: {}", e)))?;
    Ok(output)
}

/// Decodes with lopdf; pages can be measured but not rendered
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfLoader;

struct LopdfDocument {
    doc: Document,
    pages: Vec<ObjectId>,
}

impl DocumentLoader for LopdfLoader {
    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn LoadedDocument + 'a>> {
        let doc = load_document(bytes)?;
        let pages = doc.get_pages().into_values().collect();
        Ok(Box::new(LopdfDocument { doc, pages }))
    }
}

impl LoadedDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, index: usize) -> Result<PageSize> {
        let page_id = *self
            .pages
            .get(index)
            .ok_or_else(|| CompressError::Decode(format!("page {} out of range", index + 1)))?;
        Ok(page_size_of(&self.doc, page_id))
    }

    fn render_page(&self, index: usize, _viewport: Viewport) -> Result<RgbImage> {
        Err(CompressError::RenderSurface {
            page: index + 1,
            message: "no rasterizer available in this build".to_string(),
        })
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Look up a page attribute, following `/Parent` for inherited values
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict: &Dictionary = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return resolve(doc, value);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Media box size with `/Rotate` applied; US Letter when absent or malformed
pub fn page_size_of(doc: &Document, page_id: ObjectId) -> PageSize {
    let size = inherited(doc, page_id, b"MediaBox")
        .and_then(|rect| rect_size(doc, rect))
        .unwrap_or_default();

    let rotate = inherited(doc, page_id, b"Rotate")
        .and_then(number)
        .unwrap_or(0.0) as i64;

    if rotate.rem_euclid(180) == 90 {
        PageSize::new(size.height, size.width)
    } else {
        size
    }
}

fn rect_size(doc: &Document, rect: &Object) -> Option<PageSize> {
    let values = rect.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let coords = values
        .iter()
        .map(|v| resolve(doc, v).and_then(number))
        .collect::<Option<Vec<f32>>>()?;

    let width = (coords[2] - coords[0]).abs();
    let height = (coords[3] - coords[1]).abs();
    (width > 0.0 && height > 0.0).then(|| PageSize::new(width, height))
}

/// Apply the structural optimizations in place, returning the number of
/// images re-encoded. Unreachable objects go first so dropped images are
/// never decoded.
fn optimize(doc: &mut Document, options: &StructuralOptions) -> usize {
    let pruned = doc.prune_objects();
    log::debug!("Pruned {} unreachable objects", pruned.len());

    let replaced = match options.image_quality {
        Some(quality) => recompress_embedded_jpegs(doc, quality),
        None => 0,
    };
    log::debug!("Re-encoded {} embedded images", replaced);

    doc.delete_zero_length_streams();
    doc.compress();
    replaced
}

/// Writes documents with lopdf
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfRebuilder;

impl DocumentRebuilder for LopdfRebuilder {
    fn reserialize(&self, bytes: &[u8], options: &StructuralOptions) -> Result<Rebuilt> {
        let mut doc = load_document(bytes)?;
        let pages = doc.get_pages().len();

        optimize(&mut doc, options);

        // Classic xref table, no object stream packing
        let bytes = save_document(&mut doc, bytes.len())?;
        Ok(Rebuilt { bytes, pages })
    }

    fn assemble(&self, pages: &[RasterPage]) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        let mut total_image_bytes = 0;

        for page in pages {
            let image = &page.image;
            total_image_bytes += image.data.len();

            let image_id = doc.add_object(
                Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => image.width as i64,
                        "Height" => image.height as i64,
                        "ColorSpace" => image.color.pdf_color_space(),
                        "BitsPerComponent" => 8_i64,
                        "Filter" => "DCTDecode",
                    },
                    image.data.clone(),
                )
                .with_compression(false),
            );

            let Viewport { width, height } = page.viewport;
            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            Object::from(width),
                            Object::Integer(0),
                            Object::Integer(0),
                            Object::from(height),
                            Object::Integer(0),
                            Object::Integer(0),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(PAGE_IMAGE_NAME.as_bytes().to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let content_bytes = content
                .encode()
                .map_err(|e| CompressError::Unexpected(format!("Failed to encode content: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::from(width),
                    Object::from(height),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        PAGE_IMAGE_NAME => image_id,
                    },
                },
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        save_document(&mut doc, total_image_bytes + pages.len() * 512)
    }
}
