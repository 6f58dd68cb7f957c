//! Shared lopdf plumbing
//!
//! Loading, page-tree assembly, attribute inheritance and serialization used
//! by every operation.

use crate::error::{Result, ToolkitError};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Page attributes a page may inherit from its ancestor `Pages` nodes
pub(crate) const INHERITABLE_ATTRIBUTES: [&[u8]; 4] =
    [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic `/Parent` chains in malformed files
const MAX_TREE_DEPTH: usize = 64;

/// Parse PDF bytes, mapping any lopdf failure to `UnsupportedOrCorruptInput`
pub(crate) fn load_pdf(bytes: &[u8]) -> Result<Document> {
    Document::load_mem(bytes).map_err(|e| ToolkitError::UnsupportedOrCorruptInput(e.to_string()))
}

/// Compress and serialize a document
pub(crate) fn save_pdf(doc: &mut Document) -> Result<Vec<u8>> {
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ToolkitError::OperationError(format!("Failed to save PDF: {}", e)))?;

    Ok(buffer)
}

/// Start an empty document with a reserved id for its page tree root
pub(crate) fn new_document() -> (Document, ObjectId) {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    (doc, pages_id)
}

/// Write the page tree root and catalog for a document built by
/// [`new_document`]. Each page in `kids` must already point at `pages_id`.
pub(crate) fn finish_document(
    doc: &mut Document,
    pages_id: ObjectId,
    kids: &[ObjectId],
    outlines: Option<ObjectId>,
) {
    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        (
            "Kids",
            Object::Array(kids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    if let Some(outlines_id) = outlines {
        catalog.set("Outlines", Object::Reference(outlines_id));
        catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));
}

/// Id of the document catalog
pub(crate) fn catalog_id(doc: &Document) -> Result<ObjectId> {
    doc.trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| ToolkitError::OperationError("No Root in trailer".into()))
}

/// Look up `key` on a page, falling back to its ancestors in the page tree
pub(crate) fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = doc.get_object(page_id).and_then(Object::as_dict).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value.clone());
        }

        let parent_id = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_object(parent_id).and_then(Object::as_dict).ok()?;
    }

    None
}

/// Normalize rotation into [0, 360)
pub(crate) fn normalize_rotation(angle: i64) -> i64 {
    angle.rem_euclid(360)
}

/// Rotation a viewer would apply to the page, including inherited `/Rotate`
pub(crate) fn effective_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|rotate| rotate.as_i64().ok())
        .map(normalize_rotation)
        .unwrap_or(0)
}

/// Mutable access to a page dictionary
pub(crate) fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| {
            ToolkitError::OperationError(format!(
                "Page object {} {} is not a dictionary",
                page_id.0, page_id.1
            ))
        })
}

/// Encode a title as a PDF text string: literal for ASCII, UTF-16BE with BOM
/// otherwise.
pub(crate) fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), lopdf::StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, lopdf::StringFormat::Hexadecimal)
}

/// Decode a PDF text string written by [`text_string`] (or any UTF-16BE/
/// Latin-1 text string)
pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    bytes.iter().map(|&b| b as char).collect()
}
