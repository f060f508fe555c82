//! Pattern-based extraction of factual tokens from Spanish legal text.
//!
//! Three categories are recognised:
//!
//! - **Amounts**: Spanish number formatting (`.` thousands, `,` decimals)
//!   followed by a currency marker: `1.500,00 €`, `300 EUR`, `20 euros`.
//! - **Dates**: numeric `11/02/2025`, `11-02-2025`, or the long form
//!   `11 de febrero de 2025`. Different surface forms of the same day are
//!   different tokens; extraction is syntactic.
//! - **Articles**: `artículo 24`, `art. 394`, `Art 5`.
//!
//! Several patterns per category may hit the same span. Overlapping hits are
//! kept: the comparison in [`crate::compare`] works on sets, so a duplicate
//! never counts twice.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Category of an extracted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Amount,
    Date,
    Article,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 3] = [Self::Amount, Self::Date, Self::Article];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amounts",
            Self::Date => "dates",
            Self::Article => "articles",
        }
    }

    fn patterns(&self) -> &'static [Regex] {
        match self {
            Self::Amount => &AMOUNT_PATTERNS,
            Self::Date => &DATE_PATTERNS,
            Self::Article => &ARTICLE_PATTERNS,
        }
    }
}

// ── Patterns ──

static AMOUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\b\d{1,3}(?:\.\d{3})*(?:,\d{2})?\s*€",
        r"(?i)\b\d{1,3}(?:\.\d{3})*(?:,\d{2})?\s*EUR\b",
        r"(?i)\b\d{1,3}(?:\.\d{3})*(?:,\d{2})?\s*euros?\b",
        // Ungrouped thousands: 1500 €, 1500,00 EUR, 12000 euros
        r"(?i)\b\d{4,}(?:,\d{2})?\s*(?:€|EUR\b|euros?\b)",
    ])
});

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
        r"(?i)\b\d{1,2}\s+de\s+\p{L}+\s+de\s+\d{4}\b",
    ])
});

static ARTICLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\b(?:artículo|art\.?)\s+\d+",
        r"(?i)\bart\.\s+\d+",
    ])
});

fn compile(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|src| Regex::new(src).unwrap_or_else(|e| panic!("invalid pattern {src:?}: {e}")))
        .collect()
}

// ── Public API ──

/// Extract all tokens of `category` from `text`, in order of first appearance.
///
/// Tokens are trimmed but otherwise verbatim. Hits from different patterns on
/// the same span are all returned; ties at the same offset keep pattern order.
pub fn extract(text: &str, category: TokenCategory) -> Vec<String> {
    let mut hits: Vec<(usize, usize, &str)> = Vec::new();

    for (pattern_idx, re) in category.patterns().iter().enumerate() {
        for m in re.find_iter(text) {
            if starts_inside_number(text, m.start()) {
                continue;
            }
            hits.push((m.start(), pattern_idx, m.as_str()));
        }
    }

    hits.sort_by_key(|&(start, pattern_idx, _)| (start, pattern_idx));
    hits.into_iter()
        .map(|(_, _, token)| token.trim().to_string())
        .collect()
}

/// True when `start` follows a digit and a `.`/`,` separator, i.e. the hit is
/// the tail of a larger number (`00 €` inside `1500,00 €`).
fn starts_inside_number(text: &str, start: usize) -> bool {
    let mut before = text[..start].chars().rev();
    matches!(
        (before.next(), before.next()),
        (Some('.' | ','), Some(d)) if d.is_ascii_digit()
    )
}
