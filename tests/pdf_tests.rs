//! PDF stamping and merging tests
//!
//! Covers the flyer generation primitives: QR rendering, per-page
//! stamping and batch merging.

use flyerlink::pdf::{QrBounds, merge_documents, page_count, stamp_document};
use flyerlink::qr::render_qr;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

// =============================================================================
// Test helpers
// =============================================================================

/// Minimal PDF with `markers.len()` pages; each page carries a `cm` op
/// whose x translation is the page's marker, so page order survives
/// parsing.
fn build_pdf(markers: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for &marker in markers {
        let content = Content {
            operations: vec![Operation::new(
                "cm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    marker.into(),
                    0.into(),
                ],
            )],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => markers.len() as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("save pdf");
    out
}

fn bounds() -> QrBounds {
    QrBounds {
        x: 450.0,
        y: 50.0,
        width: 120.0,
        height: 120.0,
    }
}

/// x translation markers of every page's first `cm` op, in page order.
fn page_markers(pdf_bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(pdf_bytes).expect("load pdf");
    let mut markers = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let content_bytes = doc.get_page_content(page_id).expect("page content");
        let content = Content::decode(&content_bytes).expect("decode content");
        let cm = content
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .expect("cm op");
        markers.push(cm.operands[4].as_i64().expect("marker operand"));
    }
    markers
}

// =============================================================================
// QR rendering
// =============================================================================

#[test]
fn test_rendered_qr_decodes_to_url() {
    let url = "https://fly.example/r/AbCdEf123";
    let img = render_qr(url, 4).expect("render");

    let mut prepared = rqrr::PreparedImage::prepare(img);
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1);
    let (_meta, content) = grids[0].decode().expect("decode");
    assert_eq!(content, url);
}

// =============================================================================
// Stamping
// =============================================================================

#[test]
fn test_stamp_preserves_page_count() {
    let pdf = build_pdf(&[1, 2, 3]);
    let qr = render_qr("https://fly.example/r/t1", 4).expect("render");

    let stamped = stamp_document(&pdf, &qr, &bounds()).expect("stamp");
    assert_eq!(page_count(&stamped).expect("count"), 3);
}

#[test]
fn test_stamp_appends_draw_op_to_every_page() {
    let pdf = build_pdf(&[1, 2]);
    let qr = render_qr("https://fly.example/r/t2", 4).expect("render");
    let stamped = stamp_document(&pdf, &qr, &bounds()).expect("stamp");

    let doc = Document::load_mem(&stamped).expect("load");
    for (_, page_id) in doc.get_pages() {
        let content_bytes = doc.get_page_content(page_id).expect("content");
        let content = Content::decode(&content_bytes).expect("decode");
        assert!(
            content.operations.iter().any(|op| op.operator == "Do"),
            "page is missing the QR draw op"
        );
    }
}

#[test]
fn test_stamp_rejects_empty_input() {
    let qr = render_qr("https://fly.example/r/t3", 4).expect("render");
    assert!(stamp_document(b"not a pdf", &qr, &bounds()).is_err());
}

#[test]
fn test_stamp_rejects_bad_bounds() {
    let pdf = build_pdf(&[1]);
    let qr = render_qr("https://fly.example/r/t4", 4).expect("render");
    let bad = QrBounds {
        x: 0.0,
        y: 0.0,
        width: -10.0,
        height: 50.0,
    };
    assert!(stamp_document(&pdf, &qr, &bad).is_err());
}

// =============================================================================
// Merging
// =============================================================================

#[test]
fn test_merge_page_count_is_sum_of_inputs() {
    let a = build_pdf(&[1, 2]);
    let b = build_pdf(&[3]);
    let c = build_pdf(&[4, 5, 6]);

    let merged = merge_documents(&[a, b, c]).expect("merge");
    assert_eq!(page_count(&merged).expect("count"), 6);
}

#[test]
fn test_merge_preserves_input_order() {
    let a = build_pdf(&[10, 11]);
    let b = build_pdf(&[20]);
    let c = build_pdf(&[30, 31]);

    let merged = merge_documents(&[a, b, c]).expect("merge");
    assert_eq!(page_markers(&merged), vec![10, 11, 20, 30, 31]);
}

#[test]
fn test_merge_of_stamped_flyers() {
    let base = build_pdf(&[1]);
    let mut buffers = Vec::new();
    for i in 0..3 {
        let url = format!("https://fly.example/r/flyer{}", i);
        let qr = render_qr(&url, 4).expect("render");
        buffers.push(stamp_document(&base, &qr, &bounds()).expect("stamp"));
    }

    let merged = merge_documents(&buffers).expect("merge");
    assert_eq!(page_count(&merged).expect("count"), 3);
}

#[test]
fn test_merge_rejects_empty_input() {
    assert!(merge_documents(&[]).is_err());
}
