use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("document contains no extractable text")]
    NoText,

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("PDF input needs the `pdf` feature")]
    PdfUnsupported,

    #[error("document is neither PDF nor UTF-8 text")]
    NotUtf8,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists: {0}")]
    Exists(PathBuf),

    #[error("record not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid record stem {0:?}")]
    InvalidStem(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
