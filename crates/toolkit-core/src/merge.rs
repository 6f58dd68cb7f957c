//! Document merge algorithm
//!
//! Combines PDFs and raster images, in order, into a single document with a
//! flat table of contents.

use crate::document::{
    finish_document, inherited_attribute, load_pdf, new_document, page_dict_mut, save_pdf,
    INHERITABLE_ATTRIBUTES,
};
use crate::error::{Result, ToolkitError};
use crate::geometry::{Canvas, TARGET_DPI};
use crate::kind::{DocumentKind, InputDocument};
use crate::outline::{write_outline, TocEntry};
use crate::raster::{add_image_page, clamp_to_dpi, decode_rgb};
use lopdf::{Document, Object, ObjectId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Result of a merge
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutput {
    /// Serialized PDF
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub page_count: u32,
    /// Outline written into the document, one chapter per contributing input
    pub toc: Vec<TocEntry>,
}

/// Merge PDFs and images into one PDF
///
/// The algorithm:
/// 1. Create a new destination document with an empty page tree
/// 2. For each input, by kind:
///    a. PDF: materialize inherited page attributes, remap all object IDs by
///       an offset to avoid conflicts, import them and re-parent the pages
///    b. Image: decode to RGB, clamp to 300 DPI at Letter size, add one
///       Letter page with the image fitted and centered
///    c. Anything else: skip it
/// 3. Record a chapter for each contributing input at its first page
/// 4. Rebuild the page tree, write the outline, prune the source catalogs
/// 5. Compress and return the merged result
pub fn merge_documents(inputs: &[InputDocument]) -> Result<MergeOutput> {
    let (mut dest, pages_id) = new_document();
    let mut kids: Vec<ObjectId> = Vec::new();
    let mut toc = Vec::new();

    for input in inputs {
        let first_page = kids.len() as u32 + 1;

        let added = match input.kind() {
            DocumentKind::Pdf => {
                let source = load_pdf(&input.bytes).map_err(|e| e.for_input(&input.name))?;
                let page_refs = import_pages(&mut dest, source, pages_id)?;
                let count = page_refs.len();
                kids.extend(page_refs);
                count
            }
            DocumentKind::Image => {
                let img = decode_rgb(&input.bytes).map_err(|e| e.for_input(&input.name))?;
                let img = clamp_to_dpi(img, Canvas::LETTER, TARGET_DPI);
                kids.push(add_image_page(&mut dest, pages_id, &img, Canvas::LETTER)?);
                1
            }
            DocumentKind::Unknown => {
                warn!(name = %input.name, "skipping input with unsupported extension");
                continue;
            }
        };

        debug!(name = %input.name, pages = added, first_page, "merged input");

        // A zero-page PDF has no page for a chapter to point at
        if added > 0 {
            toc.push(TocEntry::chapter(input.name.clone(), first_page));
        }
    }

    if kids.is_empty() {
        return Err(ToolkitError::NoInputs);
    }

    let outlines = write_outline(&mut dest, &toc, &kids)?;
    finish_document(&mut dest, pages_id, &kids, outlines);

    // Drop the imported catalogs and page tree nodes nothing points at anymore
    dest.prune_objects();

    let bytes = save_pdf(&mut dest)?;
    let page_count = kids.len() as u32;

    info!(
        inputs = inputs.len(),
        chapters = toc.len(),
        pages = page_count,
        "merge complete"
    );

    Ok(MergeOutput {
        bytes,
        page_count,
        toc,
    })
}

/// Import every page of `source` into `dest` under `pages_id`, in order,
/// returning the new page ids.
fn import_pages(
    dest: &mut Document,
    mut source: Document,
    pages_id: ObjectId,
) -> Result<Vec<ObjectId>> {
    // Get source pages before we start modifying the document
    let source_pages: Vec<ObjectId> = source.get_pages().values().copied().collect();

    // Pages are about to leave their page tree; pin down what they inherit
    for &page_id in &source_pages {
        let inherited: Vec<(&[u8], Object)> = INHERITABLE_ATTRIBUTES
            .iter()
            .filter_map(|&key| inherited_attribute(&source, page_id, key).map(|value| (key, value)))
            .collect();

        let page = page_dict_mut(&mut source, page_id)?;
        for (key, value) in inherited {
            if !page.has(key) {
                page.set(key, value);
            }
        }
    }

    // Calculate offset for object IDs to avoid conflicts
    let id_offset = dest.max_id;
    let source_max_id = source.max_id;

    // Remap all object IDs in the source document
    let mut remapped_objects = BTreeMap::new();
    for (old_id, object) in source.objects.into_iter() {
        let new_id = (old_id.0 + id_offset, old_id.1);
        let remapped_object = remap_object_refs(object, id_offset);
        remapped_objects.insert(new_id, remapped_object);
    }

    // Add all remapped objects to destination
    dest.objects.extend(remapped_objects);
    dest.max_id = dest.max_id.max(source_max_id + id_offset);

    // Remap and re-parent source pages
    let mut page_refs = Vec::with_capacity(source_pages.len());
    for old_page_ref in source_pages {
        let new_page_ref = (old_page_ref.0 + id_offset, old_page_ref.1);
        page_dict_mut(dest, new_page_ref)?.set("Parent", Object::Reference(pages_id));
        page_refs.push(new_page_ref);
    }

    Ok(page_refs)
}

/// Recursively remap object references in an object
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}
