mod common;

use lopdf::Document;

use common::{
    image_streams, page_ids, page_image_size, text_document, FixtureBuilder, FlatRasterizer,
};
use pdf_squeeze::engine::{page_size_of, Engines};
use pdf_squeeze::model::PageSize;
use pdf_squeeze::{Compressor, FailureKind, Outcome, PdfFile, Settings, Strategy};

fn raster_compressor() -> Compressor {
    Compressor::new(Engines::lopdf_only().with_loader(FlatRasterizer::default()))
}

#[test]
fn test_structural_shrinks_uncompressed_document() {
    let bytes = FixtureBuilder::new()
        .text_page(612, 792, 300)
        .text_page(612, 792, 300)
        .orphan(20_000)
        .build();
    let file = PdfFile::new("essay.pdf", bytes);

    let (output, report) =
        Compressor::new(Engines::lopdf_only()).compress_structural_with_report(&file, 1.0);

    assert!(report.outcome.is_compressed(), "{:?}", report.outcome);
    assert!(output.len() < file.len());
    assert_eq!(output.name, "essay.pdf");
    assert_eq!(output.content_type(), "application/pdf");
    assert_eq!(report.pages, Some(2));

    let doc = Document::load_mem(&output.content).unwrap();
    assert_eq!(page_ids(&doc).len(), 2);
}

#[test]
fn test_structural_result_never_grows() {
    // Already optimized: a second pass cannot beat the first
    let file = PdfFile::new("essay.pdf", text_document(3, 200));
    let compressor = Compressor::new(Engines::lopdf_only());

    let once = compressor.compress_structural(&file, 1.0);
    let twice = compressor.compress_structural(&once, 1.0);

    assert!(once.len() <= file.len());
    assert!(twice.len() <= once.len());
}

#[test]
fn test_quality_below_one_reencodes_embedded_jpegs() {
    let bytes = FixtureBuilder::new().photo_page(300, 200).build();
    let original_image = image_streams(&Document::load_mem(&bytes).unwrap()).remove(0);
    let file = PdfFile::new("scan.pdf", bytes);
    let compressor = Compressor::new(Engines::lopdf_only());

    // Lossless pass keeps the image bytes as they are
    let lossless = compressor.compress_structural(&file, 1.0);
    let kept = image_streams(&Document::load_mem(&lossless.content).unwrap());
    assert_eq!(kept, vec![original_image.clone()]);

    let (lossy, report) = compressor.compress_structural_with_report(&file, 0.4);
    assert!(report.outcome.is_compressed());
    let reencoded = image_streams(&Document::load_mem(&lossy.content).unwrap());
    assert_eq!(reencoded.len(), 1);
    assert!(reencoded[0].len() < original_image.len());
    assert!(lossy.len() < lossless.len());
}

#[test]
fn test_raster_ten_pages_at_default_scale() {
    let sizes: Vec<(i64, i64)> = (0..10).map(|i| (600 + i * 5, 800 - i * 5)).collect();
    let bytes = sizes
        .iter()
        .fold(FixtureBuilder::new(), |b, &(w, h)| b.text_page(w, h, 400))
        .build();
    let file = PdfFile::new("thesis.pdf", bytes);

    let settings = Settings::default().with_strategy(Strategy::Raster);
    let (output, report) = raster_compressor().compress(&file, &settings);

    assert!(report.outcome.is_compressed(), "{:?}", report.outcome);
    assert!(output.len() < file.len());
    assert_eq!(report.pages, Some(10));

    let doc = Document::load_mem(&output.content).unwrap();
    let ids = page_ids(&doc);
    assert_eq!(ids.len(), 10);

    for (page_id, &(w, h)) in ids.into_iter().zip(&sizes) {
        let expected = PageSize::new(w as f32, h as f32).viewport(0.8);
        let size = page_size_of(&doc, page_id);
        assert!((size.width - expected.width).abs() < 0.01);
        assert!((size.height - expected.height).abs() < 0.01);

        let (px_w, px_h) = expected.pixel_size();
        assert_eq!(page_image_size(&doc, page_id), (px_w as i64, px_h as i64));
    }
}

#[test]
fn test_raster_without_renderer_fails_open() {
    let file = PdfFile::new("thesis.pdf", text_document(2, 50));

    let (output, report) =
        Compressor::new(Engines::lopdf_only()).compress_raster_with_report(&file, 0.8);

    assert_eq!(output.content, file.content);
    assert!(matches!(
        report.outcome,
        Outcome::Failed {
            kind: FailureKind::RenderSurface,
            ..
        }
    ));
}

#[test]
fn test_corrupted_input_is_returned_unchanged() {
    let mut bytes = text_document(1, 10);
    bytes.truncate(bytes.len() / 3);
    bytes.reverse();
    let file = PdfFile::new("corrupt.pdf", bytes);
    let compressor = raster_compressor();

    for strategy in [Strategy::Structural, Strategy::Raster, Strategy::Best] {
        let settings = Settings::default().with_strategy(strategy);
        let (output, report) = compressor.compress(&file, &settings);
        assert_eq!(output.content, file.content, "{:?}", strategy);
        assert!(report.outcome.is_failed(), "{:?}", strategy);
        assert_eq!(report.output_len, report.input_len);
    }
}

#[test]
fn test_encrypted_input_is_returned_unchanged() {
    let bytes = FixtureBuilder::new()
        .text_page(612, 792, 300)
        .encrypted()
        .build();
    let file = PdfFile::new("locked.pdf", bytes);

    let (output, report) =
        Compressor::new(Engines::lopdf_only()).compress_structural_with_report(&file, 1.0);

    assert_eq!(output.content, file.content);
    match report.outcome {
        Outcome::Failed { kind, reason } => {
            assert_eq!(kind, FailureKind::Decode);
            assert!(reason.contains("encrypted"), "{}", reason);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_best_picks_smaller_candidate() {
    let file = PdfFile::new("mixed.pdf", text_document(4, 400));
    let compressor = raster_compressor();

    let structural = compressor.compress_structural(&file, 1.0);
    let raster = compressor.compress_raster(&file, 0.8);
    let best = compressor.compress_best(&file, 1.0, 0.8);

    assert_eq!(best.len(), structural.len().min(raster.len()));
    assert!(best.len() <= file.len());
}

#[test]
fn test_out_of_range_scale_returns_original() {
    let file = PdfFile::new("thesis.pdf", text_document(1, 100));
    let compressor = raster_compressor();

    for scale in [0.0, 1.5, -1.0, f32::NAN] {
        let (output, report) = compressor.compress_raster_with_report(&file, scale);
        assert_eq!(output.content, file.content);
        assert!(matches!(
            report.outcome,
            Outcome::Failed {
                kind: FailureKind::InvalidParameter,
                ..
            }
        ));
    }
}

#[test]
fn test_full_scale_is_accepted() {
    let file = PdfFile::new("thesis.pdf", text_document(1, 400));
    let (output, report) = raster_compressor().compress_raster_with_report(&file, 1.0);
    assert!(!report.outcome.is_failed(), "{:?}", report.outcome);
    assert!(output.len() <= file.len());
}
