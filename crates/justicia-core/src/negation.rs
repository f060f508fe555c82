//! Polarity-inversion tripwire.
//!
//! A noisy heuristic: false positives are expected. The result only gates the
//! decision, it never rewrites anything.

use std::sync::LazyLock;

use regex::Regex;

static NEGATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:no|nunca|ningún|ninguna|ninguno|tampoco)\b")
        .unwrap_or_else(|e| panic!("invalid negation pattern: {e}"))
});

static NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bno\b").unwrap_or_else(|e| panic!("invalid pattern: {e}")));

static SI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsí\b").unwrap_or_else(|e| panic!("invalid pattern: {e}")));

/// Report a possible negation flip between `original` and `simplified`.
///
/// 1. One text has no negation words and the other has at least one.
/// 2. The original says "no" and the simplified says "sí".
///
/// Rule 2 is one-directional.
pub fn detects_flip(original: &str, simplified: &str) -> bool {
    let neg_original = NEGATION.find_iter(original).count();
    let neg_simplified = NEGATION.find_iter(simplified).count();

    if (neg_original == 0) != (neg_simplified == 0) {
        return true;
    }

    NO.is_match(original) && SI.is_match(simplified)
}
