//! API handlers for the toolkit server
//!
//! Every handler decodes its base64 payloads, builds a core [`Command`],
//! runs it on the blocking pool and encodes the artifact back.

use axum::Json;
use base64::{engine::general_purpose::STANDARD, Engine};
use pdf_toolkit_core::{execute, Command, CommandOutput, RotationAngle, RotationDirection, TocEntry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ServerError;

const DEFAULT_MERGE_NAME: &str = "merged.pdf";
const DEFAULT_STEM: &str = "document";
const SPLIT_ARCHIVE_NAME: &str = pdf_toolkit_core::command::SPLIT_ARCHIVE_NAME;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pdf-toolkit-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// A named, base64-encoded input file
#[derive(Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub data: String,
}

/// Merge request body
#[derive(Deserialize)]
pub struct MergeRequest {
    /// Files in output order; extension decides how each is treated
    pub files: Vec<UploadedFile>,
    pub output_name: Option<String>,
}

/// Convert request body
#[derive(Deserialize)]
pub struct ConvertRequest {
    /// Original file name, used to derive the default output name
    pub name: Option<String>,
    pub data: String,
    pub output_name: Option<String>,
}

/// Split request body
#[derive(Deserialize)]
pub struct SplitRequest {
    pub data: String,
    /// One `"<range>: <filename>"` per line
    pub ranges: String,
}

/// Rotate request body
#[derive(Deserialize)]
pub struct RotateRequest {
    pub name: Option<String>,
    pub data: String,
    /// 90, 180 or 270
    pub degrees: i64,
    /// "left" or "right"
    pub direction: String,
    pub output_name: Option<String>,
}

/// Response for every processing endpoint
#[derive(Serialize, Default)]
pub struct ProcessResponse {
    pub success: bool,
    /// Base64-encoded output (PDF or ZIP)
    pub data: Option<String>,
    /// Suggested download name
    pub filename: Option<String>,
    /// Error message if failed
    pub error: Option<String>,
    pub page_count: Option<u32>,
    /// Table of contents (merge)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toc: Option<Vec<TocEntry>>,
    /// Documents inside the archive (split)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    /// Range lines that were ignored (split)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_rotated: Option<u32>,
}

impl ProcessResponse {
    fn from_output(output: &CommandOutput, filename: String) -> Result<Self, ServerError> {
        let artifact = output
            .artifacts
            .first()
            .ok_or_else(|| ServerError::Internal("Operation produced no output".into()))?;

        Ok(Self {
            success: true,
            data: Some(STANDARD.encode(&artifact.bytes)),
            filename: Some(filename),
            page_count: Some(output.metrics.page_count),
            ..Default::default()
        })
    }
}

/// Handler: POST /api/merge
pub async fn handle_merge(
    Json(req): Json<MergeRequest>,
) -> Result<Json<ProcessResponse>, ServerError> {
    info!("Merge request: {} files", req.files.len());

    let files = req
        .files
        .into_iter()
        .map(|file| {
            let bytes = decode_payload(&file.data, &file.name)?;
            Ok((file.name, bytes))
        })
        .collect::<Result<Vec<_>, ServerError>>()?;

    let output = run(Command::Merge { files }).await?;
    let filename = output_filename(req.output_name.as_deref(), DEFAULT_MERGE_NAME, "pdf");

    let mut response = ProcessResponse::from_output(&output, filename)?;
    response.toc = Some(output.toc);
    Ok(Json(response))
}

/// Handler: POST /api/convert
pub async fn handle_convert(
    Json(req): Json<ConvertRequest>,
) -> Result<Json<ProcessResponse>, ServerError> {
    let name = req.name.as_deref().unwrap_or(DEFAULT_STEM);
    info!("Convert request: {}", name);

    let file = decode_payload(&req.data, name)?;
    let output = run(Command::Convert { file }).await?;

    let default_name = format!("{}.pdf", file_stem(name));
    let filename = output_filename(req.output_name.as_deref(), &default_name, "pdf");

    Ok(Json(ProcessResponse::from_output(&output, filename)?))
}

/// Handler: POST /api/split
pub async fn handle_split(
    Json(req): Json<SplitRequest>,
) -> Result<Json<ProcessResponse>, ServerError> {
    info!("Split request: {} range lines", req.ranges.lines().count());

    let file = decode_payload(&req.data, "data")?;
    let output = run(Command::Split {
        file,
        ranges: req.ranges,
    })
    .await?;

    let mut response = ProcessResponse::from_output(&output, SPLIT_ARCHIVE_NAME.to_string())?;
    response.files = Some(output.files);
    response.skipped = Some(output.skipped);
    Ok(Json(response))
}

/// Handler: POST /api/rotate
pub async fn handle_rotate(
    Json(req): Json<RotateRequest>,
) -> Result<Json<ProcessResponse>, ServerError> {
    info!(
        "Rotate request: {} degrees {}",
        req.degrees, req.direction
    );

    let degrees = RotationAngle::try_from(req.degrees)?;
    let direction: RotationDirection =
        req.direction.parse().map_err(ServerError::InvalidRequest)?;

    let name = req.name.as_deref().unwrap_or(DEFAULT_STEM);
    let file = decode_payload(&req.data, name)?;
    let output = run(Command::Rotate {
        file,
        degrees,
        direction,
    })
    .await?;

    let default_name = format!("{}_rotated.pdf", file_stem(name));
    let filename = output_filename(req.output_name.as_deref(), &default_name, "pdf");

    let mut response = ProcessResponse::from_output(&output, filename)?;
    response.pages_rotated = Some(output.metrics.page_count);
    Ok(Json(response))
}

/// Run a command on the blocking pool
async fn run(command: Command) -> Result<CommandOutput, ServerError> {
    let output = tokio::task::spawn_blocking(move || execute(command))
        .await
        .map_err(|e| ServerError::Internal(format!("Worker task failed: {}", e)))??;

    debug!(
        input_bytes = output.metrics.input_size_bytes,
        output_bytes = output.metrics.output_size_bytes,
        pages = output.metrics.page_count,
        elapsed_ms = output.metrics.processing_time_ms,
        "command finished"
    );

    Ok(output)
}

fn decode_payload(data: &str, name: &str) -> Result<Vec<u8>, ServerError> {
    STANDARD
        .decode(data.trim())
        .map_err(|e| ServerError::InvalidRequest(format!("Invalid base64 for '{}': {}", name, e)))
}

/// User-supplied name with `extension` appended when missing, or `default`
/// when none was given.
fn output_filename(requested: Option<&str>, default: &str, extension: &str) -> String {
    match requested.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => ensure_extension(name, extension),
        None => default.to_string(),
    }
}

fn ensure_extension(name: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension);
    if name.to_ascii_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// File name without its last extension
fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
