#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use pdf_squeeze::engine::{DocumentLoader, LoadedDocument, LopdfLoader};
use pdf_squeeze::model::{PageSize, Viewport};
use pdf_squeeze::CompressError;

/// Builds uncompressed PDFs in memory
pub struct FixtureBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// A page with `lines` lines of text drawn in an uncompressed content stream
    pub fn text_page(mut self, width: i64, height: i64, lines: usize) -> Self {
        let font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
        ];
        for i in 0..lines {
            let y = (height - 20 - (i as i64 % 70) * 10).max(10);
            operations.push(Operation::new("Td", vec![0.into(), y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(format!(
                    "Line {} of a submitted essay that repeats for padding",
                    i
                ))],
            ));
        }
        operations.push(Operation::new("ET", vec![]));
        let content = Content { operations }.encode().unwrap();
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        self.kids.push(page_id.into());
        self
    }

    /// A page showing one embedded baseline JPEG of noise at quality 100
    pub fn photo_page(mut self, px_width: u32, px_height: u32) -> Self {
        let jpeg = noisy_jpeg(px_width, px_height);
        let image_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => px_width as i64,
                "Height" => px_height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        (px_width as i64).into(),
                        0.into(),
                        0.into(),
                        (px_height as i64).into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec!["Photo".into()]),
                Operation::new("Q", vec![]),
            ],
        }
        .encode()
        .unwrap();
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (px_width as i64).into(), (px_height as i64).into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Photo" => image_id },
            },
        });
        self.kids.push(page_id.into());
        self
    }

    /// An object nothing refers to
    pub fn orphan(mut self, len: usize) -> Self {
        self.doc
            .add_object(Stream::new(dictionary! {}, vec![b'x'; len]));
        self
    }

    /// Mark the document as protected by the standard security handler
    pub fn encrypted(mut self) -> Self {
        self.doc.trailer.set(
            "Encrypt",
            dictionary! {
                "Filter" => "Standard",
                "V" => 1_i64,
                "R" => 2_i64,
                "O" => Object::string_literal(vec![0u8; 32]),
                "U" => Object::string_literal(vec![0u8; 32]),
                "P" => -4_i64,
            },
        );
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        self.doc.save_to(&mut out).unwrap();
        out
    }
}

pub fn text_document(pages: usize, lines_per_page: usize) -> Vec<u8> {
    (0..pages)
        .fold(FixtureBuilder::new(), |b, _| {
            b.text_page(612, 792, lines_per_page)
        })
        .build()
}

pub fn noisy_jpeg(width: u32, height: u32) -> Vec<u8> {
    let pixels = RgbImage::from_fn(width, height, |x, y| {
        let v = ((x * 31 + y * 17) ^ (x * y)) as u8;
        Rgb([v, v.wrapping_mul(3), 255 - v])
    });
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 100)
        .encode_image(&pixels)
        .unwrap();
    out
}

/// Decodes with lopdf and paints each page white; stands in for a real renderer
#[derive(Default)]
pub struct FlatRasterizer {
    lopdf: LopdfLoader,
}

struct FlatDocument<'a> {
    inner: Box<dyn LoadedDocument + 'a>,
}

impl DocumentLoader for FlatRasterizer {
    fn load<'a>(
        &'a self,
        bytes: &'a [u8],
    ) -> Result<Box<dyn LoadedDocument + 'a>, CompressError> {
        Ok(Box::new(FlatDocument {
            inner: self.lopdf.load(bytes)?,
        }))
    }
}

impl LoadedDocument for FlatDocument<'_> {
    fn page_count(&self) -> usize {
        self.inner.page_count()
    }

    fn page_size(&self, index: usize) -> Result<PageSize, CompressError> {
        self.inner.page_size(index)
    }

    fn render_page(&self, _index: usize, viewport: Viewport) -> Result<RgbImage, CompressError> {
        let (w, h) = viewport.pixel_size();
        Ok(RgbImage::from_pixel(w, h, Rgb([255, 255, 255])))
    }
}

/// Page ids of `bytes` in document order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Pixel size of the single image each rebuilt page shows
pub fn page_image_size(doc: &Document, page_id: ObjectId) -> (i64, i64) {
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let (_, image_ref) = xobjects.iter().next().unwrap();
    let image = doc
        .get_object(image_ref.as_reference().unwrap())
        .unwrap()
        .as_stream()
        .unwrap();
    (
        image.dict.get(b"Width").unwrap().as_i64().unwrap(),
        image.dict.get(b"Height").unwrap().as_i64().unwrap(),
    )
}

/// Content of every image stream, in object order
pub fn image_streams(doc: &Document) -> Vec<Vec<u8>> {
    doc.objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|o| o.as_name())
                .map(|n| n == b"Image")
                .unwrap_or(false)
        })
        .map(|s| s.content.clone())
        .collect()
}
