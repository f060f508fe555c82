//! Deterministic verification core for simplified Spanish judgments.
//!
//! Everything in this crate is pure: rule-based fact extraction, the negation
//! tripwire, token set comparison, judge verdict schemas and the conjunctive
//! accept/reject gate. Model-backed scoring lives in `justicia-ai`.

pub mod checks;
pub mod clean;
pub mod compare;
pub mod decision;
pub mod extract;
pub mod negation;
pub mod record;
pub mod verdict;

pub use checks::{CheckDetails, CheckResult, TokenDiff, rule_checks};
pub use clean::clean;
pub use compare::{equivalent, normalize_token};
pub use decision::{Decision, RejectReason, Thresholds, decide};
pub use extract::{TokenCategory, extract};
pub use negation::detects_flip;
pub use record::{AuditRecord, DocumentPair, SimplifyResult, round3};
pub use verdict::{
    Assessment, JudgeVerdict, Lean, LegacyVerdict, RichVerdict, RiskBand, VerdictSchemaError,
};
