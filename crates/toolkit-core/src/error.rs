use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Unsupported or corrupt input: {0}")]
    UnsupportedOrCorruptInput(String),

    #[error("Invalid page range: {0}")]
    InvalidRangeSyntax(String),

    #[error("Failed to write archive: {0}")]
    ArchiveWriteFailure(String),

    #[error("Invalid rotation: {0} (must be 90, 180 or 270)")]
    InvalidRotation(i64),

    #[error("No documents to merge")]
    NoInputs,

    #[error("PDF operation failed: {0}")]
    OperationError(String),
}

impl ToolkitError {
    /// Prefix an input error with the name of the offending input
    pub(crate) fn for_input(self, name: &str) -> Self {
        match self {
            ToolkitError::UnsupportedOrCorruptInput(msg) => {
                ToolkitError::UnsupportedOrCorruptInput(format!("{}: {}", name, msg))
            }
            other => other,
        }
    }
}

impl From<zip::result::ZipError> for ToolkitError {
    fn from(err: zip::result::ZipError) -> Self {
        ToolkitError::ArchiveWriteFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ToolkitError>;
