//! PDF Split algorithm
//!
//! Extracts page ranges from a PDF into independent documents using
//! "Construction by Whitelist": each output starts from the full source, drops
//! every page outside its range, then prunes whatever is no longer reachable.

use crate::document::{catalog_id, load_pdf, save_pdf};
use crate::error::{Result, ToolkitError};
use lopdf::{Document, Object};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Inclusive page range, 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Parse a range token like `"3"` or `"1-4"` and check it against a
    /// document of `page_count` pages.
    pub fn parse(token: &str, page_count: u32) -> Result<Self> {
        let token = token.trim();

        let (start, end) = match token.split_once('-') {
            Some((start, end)) => (parse_page(start, token)?, parse_page(end, token)?),
            None => {
                let page = parse_page(token, token)?;
                (page, page)
            }
        };

        if start > end {
            return Err(ToolkitError::InvalidRangeSyntax(format!(
                "Start {} > end {} in '{}'",
                start, end, token
            )));
        }

        if start < 1 || end > page_count {
            return Err(ToolkitError::InvalidRangeSyntax(format!(
                "Range '{}' is outside pages 1-{}",
                token, page_count
            )));
        }

        Ok(Self { start, end })
    }

    /// Number of pages covered
    pub fn page_count(&self) -> u32 {
        self.end - self.start + 1
    }

    /// 0-based indices of the first and last page
    pub fn to_indices(&self) -> (usize, usize) {
        ((self.start - 1) as usize, (self.end - 1) as usize)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

fn parse_page(part: &str, token: &str) -> Result<u32> {
    let part = part.trim();
    part.parse().map_err(|_| {
        ToolkitError::InvalidRangeSyntax(format!("Invalid page number '{}' in '{}'", part, token))
    })
}

/// One requested output: a range token and the name to file it under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitEntry {
    pub range: String,
    pub output_name: String,
}

impl SplitEntry {
    pub fn new(range: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            output_name: output_name.into(),
        }
    }
}

/// A parsed split request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitJob {
    pub entries: Vec<SplitEntry>,
    /// Lines that had no `:` between range and filename
    pub skipped: Vec<String>,
}

impl SplitJob {
    /// Parse one `"<range>: <filename>"` entry per line.
    ///
    /// The line is split at its first `:`. Lines without one are kept in
    /// `skipped` rather than failing the job; blank lines are ignored.
    /// Range tokens are not validated here.
    pub fn parse(input: &str) -> Self {
        let mut job = SplitJob::default();

        for line in input.trim().lines() {
            if line.trim().is_empty() {
                continue;
            }

            match line.split_once(':') {
                Some((range, name)) => job.entries.push(SplitEntry::new(range.trim(), name.trim())),
                None => {
                    warn!(line, "skipping malformed split line");
                    job.skipped.push(line.to_string());
                }
            }
        }

        job
    }
}

/// One produced document
#[derive(Debug, Clone)]
pub struct SplitOutput {
    pub output_name: String,
    pub range: PageRange,
    pub bytes: Vec<u8>,
}

/// Outputs of a split job plus the lines that were skipped while parsing it
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub outputs: Vec<SplitOutput>,
    pub skipped: Vec<String>,
}

/// Split a PDF into one document per entry.
///
/// Every range is validated before any output is built, so an invalid token
/// anywhere yields no outputs at all.
pub fn split_pdf(bytes: &[u8], entries: &[SplitEntry]) -> Result<Vec<SplitOutput>> {
    let doc = load_pdf(bytes)?;
    let page_count = doc.get_pages().len() as u32;

    let ranges = entries
        .iter()
        .map(|entry| PageRange::parse(&entry.range, page_count))
        .collect::<Result<Vec<_>>>()?;

    let mut outputs = Vec::with_capacity(entries.len());
    for (entry, range) in entries.iter().zip(ranges) {
        debug!(range = %range, output = %entry.output_name, "extracting pages");
        outputs.push(SplitOutput {
            output_name: entry.output_name.clone(),
            range,
            bytes: extract_range(&doc, range, page_count)?,
        });
    }

    info!(outputs = outputs.len(), source_pages = page_count, "split complete");

    Ok(outputs)
}

/// Run a parsed job, carrying its skipped lines through to the report
pub fn split_job(bytes: &[u8], job: &SplitJob) -> Result<SplitReport> {
    Ok(SplitReport {
        outputs: split_pdf(bytes, &job.entries)?,
        skipped: job.skipped.clone(),
    })
}

/// Build a standalone document holding only `range` of `source`
fn extract_range(source: &Document, range: PageRange, page_count: u32) -> Result<Vec<u8>> {
    // Clone the document for modification
    let mut new_doc = source.clone();

    // Delete unwanted pages (must delete in reverse order to maintain indices)
    let (first, last) = range.to_indices();
    let mut pages_to_delete: Vec<u32> = (0..page_count as usize)
        .filter(|index| *index < first || *index > last)
        .map(|index| index as u32 + 1)
        .collect();
    pages_to_delete.reverse();
    for page_num in pages_to_delete {
        new_doc.delete_pages(&[page_num]);
    }

    // Outline entries would point at pages that may no longer exist
    let catalog_id = catalog_id(&new_doc)?;
    if let Ok(Object::Dictionary(catalog)) = new_doc.get_object_mut(catalog_id) {
        catalog.remove(b"Outlines");
        catalog.remove(b"PageMode");
    }

    // Compress to remove orphaned objects
    new_doc.prune_objects();

    save_pdf(&mut new_doc)
}
