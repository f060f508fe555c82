//! Document ingestion and the on-disk audit trail.

pub mod audit;
pub mod error;
pub mod ingest;

pub use audit::{AuditStore, RECORD_SUFFIX, now_rfc3339, stem_of};
pub use error::{IngestError, StoreError};
pub use ingest::{extract_text, read_document};
