//! Verification inputs and the persisted audit record.

use serde::{Deserialize, Serialize};

use crate::checks::{CheckDetails, CheckResult};
use crate::decision::Decision;
use crate::verdict::JudgeVerdict;

/// An original judgment and its simplified rewrite, verified together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPair {
    original: String,
    simplified: String,
}

impl DocumentPair {
    pub fn new(original: impl Into<String>, simplified: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            simplified: simplified.into(),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn simplified(&self) -> &str {
        &self.simplified
    }

    pub fn into_parts(self) -> (String, String) {
        (self.original, self.simplified)
    }
}

/// Evidence gathered by one verification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifyResult {
    pub original: String,
    pub simplified: String,
    pub checks: CheckResult,
    #[serde(default)]
    pub details: CheckDetails,
    /// Cosine similarity rounded to 3 decimals; 0.0 when it could not be computed.
    pub similarity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_error: Option<String>,
    pub judge: JudgeVerdict,
}

/// One persisted record per processed document. Written once, read by reviewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(flatten)]
    pub result: SimplifyResult,
    pub decision: Decision,
    /// Input file name, when the document came from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// RFC 3339 timestamp.
    pub processed_at: String,
}

/// Round to 3 decimals, as similarity scores are recorded.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
