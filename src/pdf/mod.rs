//! PDF stamping and merging.
//!
//! `stamp_document` paints a white rectangle over the marked QR area on
//! every page of the base PDF and composites the tracking QR raster into
//! the same rectangle. `merge_documents` concatenates the stamped copies
//! into one combined document, preserving flyer order.

use std::collections::BTreeMap;

use image::GrayImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use serde::{Deserialize, Serialize};

use crate::errors::{FlyerlinkError, Result};

/// Resource name of the stamped QR image XObject.
const QR_XOBJECT_NAME: &[u8] = b"QRstamp";

/// Rectangle marking where the QR code sits, in PDF points with the origin
/// at the lower-left corner of the page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QrBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl QrBounds {
    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite()
            || !self.height.is_finite()
            || !self.x.is_finite()
            || !self.y.is_finite()
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(FlyerlinkError::validation(
                "qrBounds must have positive, finite width and height".to_string(),
            ));
        }
        Ok(())
    }
}

/// Number of pages in a PDF.
pub fn page_count(pdf_bytes: &[u8]) -> Result<usize> {
    let doc = Document::load_mem(pdf_bytes)?;
    Ok(doc.get_pages().len())
}

/// Stamp `qr` over `bounds` on every page of the document.
pub fn stamp_document(pdf_bytes: &[u8], qr: &GrayImage, bounds: &QrBounds) -> Result<Vec<u8>> {
    bounds.validate()?;

    let mut doc = Document::load_mem(pdf_bytes)
        .map_err(|e| FlyerlinkError::pdf_processing(format!("Failed to load PDF: {}", e)))?;

    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    if pages.is_empty() {
        return Err(FlyerlinkError::pdf_processing(
            "PDF has no pages".to_string(),
        ));
    }

    let image_id = doc.add_object(qr_image_xobject(qr));

    for page_id in pages {
        doc.add_xobject(page_id, QR_XOBJECT_NAME, image_id)
            .map_err(|e| {
                FlyerlinkError::pdf_processing(format!("Failed to attach QR image: {}", e))
            })?;
        doc.add_to_page_content(page_id, stamp_content(bounds))
            .map_err(|e| {
                FlyerlinkError::pdf_processing(format!("Failed to append stamp content: {}", e))
            })?;
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| FlyerlinkError::pdf_processing(format!("Failed to save PDF: {}", e)))?;
    Ok(out)
}

/// Concatenate documents into one, pages in input order.
pub fn merge_documents(pdf_buffers: &[Vec<u8>]) -> Result<Vec<u8>> {
    if pdf_buffers.is_empty() {
        return Err(FlyerlinkError::pdf_processing(
            "Nothing to merge".to_string(),
        ));
    }

    let mut max_id = 1u32;
    let mut page_objects: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut all_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for buffer in pdf_buffers {
        let mut doc = Document::load_mem(buffer)
            .map_err(|e| FlyerlinkError::pdf_processing(format!("Failed to load PDF: {}", e)))?;
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        // get_pages is keyed by page number, so iteration preserves the
        // document's own page order.
        for (_, page_id) in doc.get_pages() {
            let dict = doc
                .get_object(page_id)
                .and_then(Object::as_dict)
                .map_err(|e| {
                    FlyerlinkError::pdf_processing(format!("Malformed page object: {}", e))
                })?
                .clone();
            page_objects.push((page_id, dict));
        }

        all_objects.extend(doc.objects);
    }

    if page_objects.is_empty() {
        return Err(FlyerlinkError::pdf_processing(
            "Merged input has no pages".to_string(),
        ));
    }

    let mut merged = Document::with_version("1.5");
    let mut catalog: Option<(ObjectId, Dictionary)> = None;
    let mut pages_root: Option<(ObjectId, Dictionary)> = None;

    for (object_id, object) in all_objects {
        let type_name = object
            .as_dict()
            .ok()
            .and_then(|d| d.get(b"Type").ok())
            .and_then(|t| t.as_name().ok());

        match type_name {
            Some(b"Catalog") => {
                if catalog.is_none()
                    && let Ok(dict) = object.as_dict()
                {
                    catalog = Some((object_id, dict.clone()));
                }
            }
            Some(b"Pages") => {
                // Keep the first Pages dict so inheritable attributes
                // (MediaBox and friends) survive the reparenting.
                if pages_root.is_none()
                    && let Ok(dict) = object.as_dict()
                {
                    pages_root = Some((object_id, dict.clone()));
                }
            }
            Some(b"Page") | Some(b"Outlines") | Some(b"Outline") => {}
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    let (catalog_id, mut catalog_dict) = catalog.ok_or_else(|| {
        FlyerlinkError::pdf_processing("Merged input has no catalog".to_string())
    })?;
    let (pages_id, mut pages_dict) = pages_root.ok_or_else(|| {
        FlyerlinkError::pdf_processing("Merged input has no page tree".to_string())
    })?;

    for (page_id, mut dict) in page_objects.iter().map(|(id, d)| (*id, d.clone())) {
        dict.set("Parent", pages_id);
        merged.objects.insert(page_id, Object::Dictionary(dict));
    }

    pages_dict.set("Count", page_objects.len() as i64);
    pages_dict.set(
        "Kids",
        page_objects
            .iter()
            .map(|(id, _)| Object::Reference(*id))
            .collect::<Vec<Object>>(),
    );
    pages_dict.remove(b"Parent");
    merged
        .objects
        .insert(pages_id, Object::Dictionary(pages_dict));

    catalog_dict.set("Pages", pages_id);
    catalog_dict.remove(b"Outlines");
    merged
        .objects
        .insert(catalog_id, Object::Dictionary(catalog_dict));

    merged.trailer.set("Root", catalog_id);
    merged.max_id = max_id;
    merged.renumber_objects();

    let mut out = Vec::new();
    merged
        .save_to(&mut out)
        .map_err(|e| FlyerlinkError::pdf_processing(format!("Failed to save merged PDF: {}", e)))?;
    Ok(out)
}

/// Grayscale image XObject for the QR raster, uncompressed DeviceGray.
fn qr_image_xobject(img: &GrayImage) -> Stream {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(img.width() as i64));
    dict.set("Height", Object::Integer(img.height() as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceGray".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));

    Stream::new(dict, img.as_raw().clone())
}

fn real(v: f32) -> Object {
    Object::Real(v.into())
}

/// White cover rectangle followed by the QR image, both over `bounds`.
fn stamp_content(b: &QrBounds) -> Content {
    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new("rg", vec![real(1.0), real(1.0), real(1.0)]),
            Operation::new("re", vec![real(b.x), real(b.y), real(b.width), real(b.height)]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(b.width),
                    real(0.0),
                    real(0.0),
                    real(b.height),
                    real(b.x),
                    real(b.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(QR_XOBJECT_NAME.to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
}
