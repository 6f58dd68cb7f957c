//! Error types for the toolkit server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdf_toolkit_core::ToolkitError;
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid rotation: {0}")]
    InvalidRotation(String),

    #[error("No documents to merge")]
    NoInputs,

    #[error("Archive write failed: {0}")]
    ArchiveWriteFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServerError::UnsupportedInput(msg) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_INPUT", msg.clone())
            }
            ServerError::InvalidRange(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_RANGE", msg.clone())
            }
            ServerError::InvalidRotation(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_ROTATION", msg.clone())
            }
            ServerError::NoInputs => (
                StatusCode::BAD_REQUEST,
                "NO_INPUTS",
                "No PDF or image files to merge".to_string(),
            ),
            ServerError::ArchiveWriteFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ARCHIVE_WRITE_FAILED",
                msg.clone(),
            ),
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ServerError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
        } else {
            tracing::debug!(code, error = %message, "request rejected");
        }

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ToolkitError> for ServerError {
    fn from(err: ToolkitError) -> Self {
        let message = err.to_string();
        match err {
            ToolkitError::UnsupportedOrCorruptInput(_) => ServerError::UnsupportedInput(message),
            ToolkitError::InvalidRangeSyntax(_) => ServerError::InvalidRange(message),
            ToolkitError::InvalidRotation(_) => ServerError::InvalidRotation(message),
            ToolkitError::NoInputs => ServerError::NoInputs,
            ToolkitError::ArchiveWriteFailure(_) => ServerError::ArchiveWriteFailed(message),
            ToolkitError::OperationError(_) => ServerError::Internal(message),
        }
    }
}
