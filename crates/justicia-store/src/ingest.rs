//! Turning input files into judgment text.
//!
//! PDFs are read through their embedded text layer only. Scanned judgments
//! without one yield [`IngestError::NoText`].

use std::path::Path;

use tracing::debug;

use crate::error::IngestError;

const PDF_MAGIC: &[u8] = b"%PDF";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Extract text from a document's bytes: PDF text layer or UTF-8 text.
pub fn extract_text(bytes: &[u8]) -> Result<String, IngestError> {
    let text = if bytes.starts_with(PDF_MAGIC) {
        pdf_text(bytes)?
    } else {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        String::from_utf8(body.to_vec()).map_err(|_| IngestError::NotUtf8)?
    };

    if text.trim().is_empty() {
        return Err(IngestError::NoText);
    }
    debug!(chars = text.chars().count(), "extracted document text");
    Ok(text)
}

/// Read and extract a document from disk.
pub fn read_document(path: &Path) -> Result<String, IngestError> {
    let bytes = std::fs::read(path)?;
    extract_text(&bytes)
}

#[cfg(feature = "pdf")]
fn pdf_text(bytes: &[u8]) -> Result<String, IngestError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| IngestError::Pdf(e.to_string()))
}

#[cfg(not(feature = "pdf"))]
fn pdf_text(_bytes: &[u8]) -> Result<String, IngestError> {
    Err(IngestError::PdfUnsupported)
}
