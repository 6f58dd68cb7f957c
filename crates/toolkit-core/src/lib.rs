//! PDF toolkit operations
//!
//! Pure in-memory transformations built on lopdf and image:
//! - [`merge_documents`]: PDFs and images into one PDF with a table of contents
//! - [`image_to_pdf`]: a single image onto a Letter page
//! - [`split_pdf`]: page ranges into standalone PDFs
//! - [`package_archive`]: named buffers into a ZIP
//! - [`rotate_pdf`]: every page by a multiple of 90 degrees
//!
//! [`command::execute`] dispatches a serialized [`Command`] to the right one.

pub mod archive;
pub mod command;
pub mod convert;
pub(crate) mod document;
pub mod error;
pub mod geometry;
pub mod kind;
pub mod merge;
pub mod outline;
pub(crate) mod raster;
pub mod rotate;
pub mod split;

#[cfg(test)]
mod test_support;

pub use archive::package_archive;
pub use command::{execute, Artifact, Command, CommandOutput, ProcessMetrics};
pub use convert::image_to_pdf;
pub use error::{Result, ToolkitError};
pub use kind::{DocumentKind, InputDocument};
pub use merge::{merge_documents, MergeOutput};
pub use outline::{read_outline, TocEntry};
pub use rotate::{rotate_pdf, RotateOutput, RotationAngle, RotationDirection};
pub use split::{split_job, split_pdf, PageRange, SplitEntry, SplitJob, SplitOutput, SplitReport};

/// Parse PDF bytes and return page count
pub fn page_count(bytes: &[u8]) -> Result<u32> {
    let doc = document::load_pdf(bytes)?;
    Ok(doc.get_pages().len() as u32)
}
