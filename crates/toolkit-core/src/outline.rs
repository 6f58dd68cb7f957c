//! Table of contents (document outline)
//!
//! The merger produces a flat outline: one level-1 item per input, each with
//! a `/Fit` destination on the first page that input contributed.

use crate::document::{catalog_id, decode_text_string, load_pdf, text_string};
use crate::error::{Result, ToolkitError};
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Guards against cyclic `/Next` chains when reading outlines back
const MAX_OUTLINE_ITEMS: usize = 10_000;

/// One table-of-contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting level, 1 for top-level chapters
    pub level: u32,
    pub title: String,
    /// Target page (1-indexed)
    pub page: u32,
}

impl TocEntry {
    pub fn chapter(title: impl Into<String>, page: u32) -> Self {
        Self {
            level: 1,
            title: title.into(),
            page,
        }
    }
}

/// Write `entries` as a flat outline tree and return the `/Outlines` root id.
///
/// `page_ids` is the final page order of `doc`; each entry's `page` indexes
/// into it. Returns `Ok(None)` when there is nothing to write.
pub(crate) fn write_outline(
    doc: &mut Document,
    entries: &[TocEntry],
    page_ids: &[ObjectId],
) -> Result<Option<ObjectId>> {
    if entries.is_empty() {
        return Ok(None);
    }

    let root_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = entries.iter().map(|_| doc.new_object_id()).collect();

    for (i, entry) in entries.iter().enumerate() {
        let target = entry
            .page
            .checked_sub(1)
            .and_then(|index| page_ids.get(index as usize))
            .ok_or_else(|| {
                ToolkitError::OperationError(format!(
                    "Outline entry '{}' targets page {} of {}",
                    entry.title,
                    entry.page,
                    page_ids.len()
                ))
            })?;

        let mut item = Dictionary::from_iter(vec![
            ("Title", text_string(&entry.title)),
            ("Parent", Object::Reference(root_id)),
            (
                "Dest",
                Object::Array(vec![
                    Object::Reference(*target),
                    Object::Name(b"Fit".to_vec()),
                ]),
            ),
        ]);
        if i > 0 {
            item.set("Prev", Object::Reference(item_ids[i - 1]));
        }
        if let Some(next) = item_ids.get(i + 1) {
            item.set("Next", Object::Reference(*next));
        }

        doc.objects.insert(item_ids[i], Object::Dictionary(item));
    }

    let root = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Outlines".to_vec())),
        ("First", Object::Reference(item_ids[0])),
        ("Last", Object::Reference(item_ids[item_ids.len() - 1])),
        ("Count", Object::Integer(item_ids.len() as i64)),
    ]);
    doc.objects.insert(root_id, Object::Dictionary(root));

    Ok(Some(root_id))
}

/// Read the top-level outline of a PDF back as TOC entries.
///
/// Items whose destination is not a direct page reference are skipped.
pub fn read_outline(bytes: &[u8]) -> Result<Vec<TocEntry>> {
    let doc = load_pdf(bytes)?;
    outline_entries(&doc)
}

pub(crate) fn outline_entries(doc: &Document) -> Result<Vec<TocEntry>> {
    let page_numbers: HashMap<ObjectId, u32> =
        doc.get_pages().into_iter().map(|(num, id)| (id, num)).collect();

    let catalog = doc
        .get_object(catalog_id(doc)?)
        .and_then(Object::as_dict)
        .map_err(|_| ToolkitError::OperationError("Invalid catalog".into()))?;

    let Some(root) = catalog
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_object(id))
        .and_then(Object::as_dict)
        .ok()
    else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    let mut next = root.get(b"First").and_then(Object::as_reference).ok();

    while let Some(item_id) = next {
        if entries.len() >= MAX_OUTLINE_ITEMS {
            break;
        }
        let Ok(item) = doc.get_object(item_id).and_then(Object::as_dict) else {
            break;
        };

        let title = item
            .get(b"Title")
            .and_then(Object::as_str)
            .map(decode_text_string)
            .unwrap_or_default();

        let page = item
            .get(b"Dest")
            .and_then(Object::as_array)
            .ok()
            .and_then(|dest| dest.first())
            .and_then(|target| target.as_reference().ok())
            .and_then(|page_id| page_numbers.get(&page_id).copied());

        if let Some(page) = page {
            entries.push(TocEntry::chapter(title, page));
        }

        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }

    Ok(entries)
}
