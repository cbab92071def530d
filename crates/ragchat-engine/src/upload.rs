//! Document upload model.
//!
//! Provides [`SelectedFile`], the file the user picked, and [`UploadStatus`],
//! the one-line status shown for the most recent upload attempt.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The only content type the backend accepts.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Fallback content type for unknown extensions.
const OCTET_STREAM: &str = "application/octet-stream";

/// Status text while an upload is in flight.
pub const PROCESSING_TEXT: &str = "Uploading & Processing...";

/// Status text when the selected file is not a PDF.
pub const NOT_PDF_TEXT: &str = "Error: Only PDFs allowed.";

/// Status text when the server fails without a usable detail.
pub const GENERIC_FAILURE_TEXT: &str = "Error: Upload failed.";

/// Status text when the server cannot be reached.
pub const CONNECT_FAILURE_TEXT: &str = "Error: Could not connect to server.";

/// A file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Location on disk.
    pub path: PathBuf,
    /// File name sent with the multipart part.
    pub name: String,
    /// Declared content type, derived from the extension.
    pub content_type: String,
}

impl SelectedFile {
    /// Describe the file at `path` without reading it.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let content_type = content_type_for(&path).to_string();
        Self {
            path,
            name,
            content_type,
        }
    }

    /// Whether the declared type is `application/pdf`.
    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_CONTENT_TYPE
    }
}

/// Declared content type for `path`: PDF by extension, anything else opaque.
pub fn content_type_for(path: &Path) -> &'static str {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        PDF_CONTENT_TYPE
    } else {
        OCTET_STREAM
    }
}

/// Colour class of the upload status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    /// Work in progress.
    Neutral,
    /// The document was processed.
    Success,
    /// The attempt failed.
    Error,
}

/// Status of the most recent upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStatus {
    /// Display text.
    pub text: String,
    /// Display tone.
    pub tone: StatusTone,
}

impl UploadStatus {
    /// Upload in flight.
    pub fn processing() -> Self {
        Self {
            text: PROCESSING_TEXT.into(),
            tone: StatusTone::Neutral,
        }
    }

    /// Document processed into `chunks` chunks.
    pub fn ready(chunks: u64) -> Self {
        Self {
            text: format!("✓ Ready! ({chunks} chunks)"),
            tone: StatusTone::Success,
        }
    }

    /// Local rejection of a non-PDF file.
    pub fn not_pdf() -> Self {
        Self::error_text(NOT_PDF_TEXT)
    }

    /// Server-side failure, preferring the server's detail string.
    pub fn server_error(detail: Option<&str>) -> Self {
        match detail.map(str::trim).filter(|d| !d.is_empty()) {
            Some(detail) => Self::error_text(format!("Error: {detail}")),
            None => Self::error_text(GENERIC_FAILURE_TEXT),
        }
    }

    /// The server could not be reached.
    pub fn connect_error() -> Self {
        Self::error_text(CONNECT_FAILURE_TEXT)
    }

    /// The selected file could not be read locally.
    pub fn read_error(name: &str) -> Self {
        Self::error_text(format!("Error: Could not read {name}."))
    }

    fn error_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Error,
        }
    }

    /// Whether this status reports a failure.
    pub fn is_error(&self) -> bool {
        self.tone == StatusTone::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_file_from_path() {
        let file = SelectedFile::from_path("/tmp/docs/Report.PDF");
        assert_eq!(file.name, "Report.PDF");
        assert!(file.is_pdf());

        let notes = SelectedFile::from_path("notes.txt");
        assert_eq!(notes.content_type, OCTET_STREAM);
        assert!(!notes.is_pdf());
    }

    #[test]
    fn test_only_pdf_extension_is_pdf() {
        assert_eq!(content_type_for(Path::new("archive.xyz")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("no_extension")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("pdf")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("scan.pDf")), PDF_CONTENT_TYPE);
    }

    #[test]
    fn test_ready_status_mentions_chunks() {
        let status = UploadStatus::ready(5);
        assert_eq!(status.tone, StatusTone::Success);
        assert!(status.text.contains('5'));
    }

    #[test]
    fn test_server_error_prefers_detail() {
        let status = UploadStatus::server_error(Some("Only PDF files are allowed"));
        assert_eq!(status.text, "Error: Only PDF files are allowed");
        assert!(status.is_error());

        assert_eq!(UploadStatus::server_error(None).text, GENERIC_FAILURE_TEXT);
        assert_eq!(UploadStatus::server_error(Some("  ")).text, GENERIC_FAILURE_TEXT);
    }
}
