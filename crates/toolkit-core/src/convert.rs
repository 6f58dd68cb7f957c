//! Image to PDF conversion
//!
//! Wraps a single raster image as one Letter page. Unlike the merger, no DPI
//! clamp is applied: pixels go into the PDF as decoded, and small images are
//! scaled up to fill the page.

use crate::document::{finish_document, new_document, save_pdf};
use crate::error::Result;
use crate::geometry::Canvas;
use crate::raster::{add_image_page, decode_rgb};
use tracing::info;

/// Convert an image (PNG or JPEG) into a single-page Letter PDF
pub fn image_to_pdf(image_bytes: &[u8]) -> Result<Vec<u8>> {
    let img = decode_rgb(image_bytes)?;

    let (mut doc, pages_id) = new_document();
    let page_id = add_image_page(&mut doc, pages_id, &img, Canvas::LETTER)?;
    finish_document(&mut doc, pages_id, &[page_id], None);

    let bytes = save_pdf(&mut doc)?;

    info!(
        width = img.width(),
        height = img.height(),
        size = bytes.len(),
        "converted image to PDF"
    );

    Ok(bytes)
}
