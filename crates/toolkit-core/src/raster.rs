//! Raster image decoding and placement
//!
//! Images are decoded with the `image` crate, normalized to 8-bit RGB and
//! embedded as Flate-compressed `DeviceRGB` image XObjects. Flate keeps the
//! pixels lossless, so nothing is re-quantized on the way into the PDF.

use crate::error::{Result, ToolkitError};
use crate::geometry::{downscale_to_fit, Canvas};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::imageops::FilterType;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;
use tracing::debug;

/// Resource name the placed image is registered under on its page
const IMAGE_RESOURCE: &str = "Im0";

/// Decode any supported raster format and force it to 3-channel RGB
pub(crate) fn decode_rgb(bytes: &[u8]) -> Result<RgbImage> {
    let decoded = image::load_from_memory(bytes).map_err(|e| {
        ToolkitError::UnsupportedOrCorruptInput(format!("Failed to decode image: {}", e))
    })?;

    debug!(
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        "decoded image"
    );

    Ok(decoded.to_rgb8())
}

/// Downsample with Lanczos3 so the image prints at no more than `dpi` on
/// `canvas`. Images already within bounds are returned untouched.
pub(crate) fn clamp_to_dpi(img: RgbImage, canvas: Canvas, dpi: u32) -> RgbImage {
    let (max_width, max_height) = canvas.pixel_bounds(dpi);

    match downscale_to_fit(img.width(), img.height(), max_width, max_height) {
        Some((width, height)) => {
            debug!(
                from_width = img.width(),
                from_height = img.height(),
                width,
                height,
                "downsampling image"
            );
            image::imageops::resize(&img, width, height, FilterType::Lanczos3)
        }
        None => img,
    }
}

/// Append a new `canvas`-sized page to `doc` showing `img` scaled to fit and
/// centered. The page is parented to `pages_id`; the caller owns the page
/// tree and must add the returned id to its kids.
pub(crate) fn add_image_page(
    doc: &mut Document,
    pages_id: ObjectId,
    img: &RgbImage,
    canvas: Canvas,
) -> Result<ObjectId> {
    let (width_px, height_px) = img.dimensions();
    let placement = canvas.fit_centered(width_px, height_px);

    let image_id = doc.add_object(image_xobject(img)?);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(placement.width as f32),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(placement.height as f32),
                    Object::Real(placement.x as f32),
                    Object::Real(placement.y as f32),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content.encode().map_err(|e| {
        ToolkitError::OperationError(format!("Failed to encode page content: {}", e))
    })?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    let xobjects = Dictionary::from_iter(vec![(IMAGE_RESOURCE, Object::Reference(image_id))]);
    let resources = Dictionary::from_iter(vec![("XObject", Object::Dictionary(xobjects))]);

    let page = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(canvas.width as f32),
                Object::Real(canvas.height as f32),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]);
    let page_id = doc.add_object(page);

    debug!(
        width_px,
        height_px,
        x = placement.x,
        y = placement.y,
        width = placement.width,
        height = placement.height,
        "placed image page"
    );

    Ok(page_id)
}

/// Build the image XObject stream for an RGB buffer
fn image_xobject(img: &RgbImage) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(img.as_raw())
        .map_err(|e| ToolkitError::OperationError(format!("Failed to compress image: {}", e)))?;
    let compressed = encoder
        .finish()
        .map_err(|e| ToolkitError::OperationError(format!("Failed to compress image: {}", e)))?;

    let dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(img.width() as i64)),
        ("Height", Object::Integer(img.height() as i64)),
        ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"FlateDecode".to_vec())),
    ]);

    Ok(Stream::new(dict, compressed).with_compression(false))
}
