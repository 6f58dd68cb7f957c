//! ZIP packaging for multi-file results

use crate::error::{Result, ToolkitError};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Pack named buffers into one deflate-compressed ZIP archive.
///
/// Names are used verbatim as entry names: no renaming, no path
/// sanitization. A repeated name fails with `ArchiveWriteFailure` before
/// anything is written.
pub fn package_archive<N, B>(entries: &[(N, B)]) -> Result<Vec<u8>>
where
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    let mut seen = HashSet::with_capacity(entries.len());
    for (name, _) in entries {
        if !seen.insert(name.as_ref()) {
            return Err(ToolkitError::ArchiveWriteFailure(format!(
                "Duplicate entry name '{}'",
                name.as_ref()
            )));
        }
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, bytes) in entries {
        let (name, bytes) = (name.as_ref(), bytes.as_ref());
        debug!(name, size = bytes.len(), "adding archive entry");

        writer.start_file(name, options)?;
        writer
            .write_all(bytes)
            .map_err(|e| ToolkitError::ArchiveWriteFailure(format!("{}: {}", name, e)))?;
    }

    Ok(writer.finish()?.into_inner())
}
