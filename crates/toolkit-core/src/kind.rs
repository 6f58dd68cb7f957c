//! Input classification
//!
//! Inputs are classified once, by filename extension, into a closed set of
//! kinds. Everything downstream matches on [`DocumentKind`].

/// What an input is, as far as the toolkit is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
    Unknown,
}

impl DocumentKind {
    /// Classify a filename by the suffix after its last `.` (case-insensitive).
    ///
    /// A name without any `.` is treated as if the whole name were the suffix,
    /// so `"pdf"` is a PDF and `"report"` is unknown.
    pub fn from_name(name: &str) -> Self {
        let extension = name.rsplit('.').next().unwrap_or_default();
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => DocumentKind::Pdf,
            "jpg" | "jpeg" | "png" => DocumentKind::Image,
            _ => DocumentKind::Unknown,
        }
    }
}

/// A named blob of bytes handed to the merger
#[derive(Debug, Clone)]
pub struct InputDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_name(&self.name)
    }
}
