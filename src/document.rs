//! The PDF payload sent to the notes service.

use std::path::Path;

use crate::error::SubmissionError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A validated document ready to be uploaded.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    /// Read a PDF from disk.
    pub async fn from_path(path: &Path) -> Result<Self, SubmissionError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            SubmissionError::InvalidDocument(format!("cannot read {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string();
        Self::from_bytes(file_name, bytes)
    }

    /// Accepts the document if it has a `.pdf` extension or starts with the
    /// PDF magic bytes. Empty documents are always rejected.
    pub fn from_bytes(file_name: String, bytes: Vec<u8>) -> Result<Self, SubmissionError> {
        if bytes.is_empty() {
            return Err(SubmissionError::InvalidDocument(format!(
                "{file_name} is empty"
            )));
        }
        let has_pdf_extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if !has_pdf_extension && !bytes.starts_with(PDF_MAGIC) {
            return Err(SubmissionError::InvalidDocument(format!(
                "{file_name} is not a PDF file"
            )));
        }
        Ok(Self { file_name, bytes })
    }
}
