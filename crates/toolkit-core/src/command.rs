//! Single entry point over all operations
//!
//! Adapters deserialize a [`Command`], hand it to [`execute`] and get back
//! named artifacts plus metrics, without knowing which operation ran.

use crate::archive::package_archive;
use crate::convert::image_to_pdf;
use crate::error::Result;
use crate::kind::InputDocument;
use crate::merge::merge_documents;
use crate::outline::TocEntry;
use crate::rotate::{rotate_pdf, RotationAngle, RotationDirection};
use crate::split::{split_job, SplitJob};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Name of the archive a split command produces
pub const SPLIT_ARCHIVE_NAME: &str = "split_pdfs.zip";

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    Merge {
        /// `(name, bytes)` pairs, in output order
        files: Vec<(String, Vec<u8>)>,
    },
    Convert {
        file: Vec<u8>,
    },
    Split {
        file: Vec<u8>,
        /// One `"<range>: <filename>"` per line
        ranges: String,
    },
    Rotate {
        file: Vec<u8>,
        degrees: RotationAngle,
        direction: RotationDirection,
    },
}

impl Command {
    fn input_size(&self) -> usize {
        match self {
            Command::Merge { files } => files.iter().map(|(_, bytes)| bytes.len()).sum(),
            Command::Convert { file }
            | Command::Split { file, .. }
            | Command::Rotate { file, .. } => file.len(),
        }
    }
}

/// A named output buffer
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub artifacts: Vec<Artifact>,
    /// Names of the documents packed into an archive artifact
    pub files: Vec<String>,
    /// Split lines that could not be parsed
    pub skipped: Vec<String>,
    /// Table of contents (merge only)
    pub toc: Vec<TocEntry>,
    pub metrics: ProcessMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessMetrics {
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub page_count: u32,
    pub processing_time_ms: u64,
}

/// Run a command to completion
pub fn execute(command: Command) -> Result<CommandOutput> {
    let started = Instant::now();
    let input_size_bytes = command.input_size();

    let mut archived = Vec::new();
    let mut skipped = Vec::new();
    let mut toc = Vec::new();

    let (artifacts, page_count) = match command {
        Command::Merge { files } => {
            let inputs: Vec<InputDocument> = files
                .into_iter()
                .map(|(name, bytes)| InputDocument::new(name, bytes))
                .collect();
            let merged = merge_documents(&inputs)?;
            toc = merged.toc;
            (
                vec![Artifact {
                    name: "merged.pdf".to_string(),
                    bytes: merged.bytes,
                }],
                merged.page_count,
            )
        }
        Command::Convert { file } => (
            vec![Artifact {
                name: "converted.pdf".to_string(),
                bytes: image_to_pdf(&file)?,
            }],
            1,
        ),
        Command::Split { file, ranges } => {
            let report = split_job(&file, &SplitJob::parse(&ranges))?;
            skipped = report.skipped;

            let page_count = report.outputs.iter().map(|o| o.range.page_count()).sum();
            let entries: Vec<(&str, &[u8])> = report
                .outputs
                .iter()
                .map(|o| (o.output_name.as_str(), o.bytes.as_slice()))
                .collect();
            let archive = package_archive(&entries)?;
            archived = report.outputs.iter().map(|o| o.output_name.clone()).collect();

            (
                vec![Artifact {
                    name: SPLIT_ARCHIVE_NAME.to_string(),
                    bytes: archive,
                }],
                page_count,
            )
        }
        Command::Rotate {
            file,
            degrees,
            direction,
        } => {
            let rotated = rotate_pdf(&file, degrees, direction)?;
            (
                vec![Artifact {
                    name: "rotated.pdf".to_string(),
                    bytes: rotated.bytes,
                }],
                rotated.pages_rotated,
            )
        }
    };

    let metrics = ProcessMetrics {
        input_size_bytes,
        output_size_bytes: artifacts.iter().map(|a| a.bytes.len()).sum(),
        page_count,
        processing_time_ms: started.elapsed().as_millis() as u64,
    };

    Ok(CommandOutput {
        artifacts,
        files: archived,
        skipped,
        toc,
        metrics,
    })
}
