//! Deterministic rule checks over an original/simplified pair.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compare::equivalent;
use crate::extract::{TokenCategory, extract};
use crate::negation::detects_flip;

pub const NEGATION_NOTE: &str = "Negation may have been flipped";

/// Outcome of the rule checks.
///
/// `amounts_ok`, `dates_ok` and `articles_ok` are success signals.
/// `negation_flip` is a failure signal: `true` means polarity may be inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub amounts_ok: bool,
    pub dates_ok: bool,
    pub articles_ok: bool,
    pub negation_flip: bool,
}

impl CheckResult {
    /// All three fact checks pass. Does not look at `negation_flip`.
    pub fn facts_ok(&self) -> bool {
        self.amounts_ok && self.dates_ok && self.articles_ok
    }

    /// Fact checks pass and no negation flip was flagged.
    pub fn passed(&self) -> bool {
        self.facts_ok() && !self.negation_flip
    }
}

/// Tokens found on each side of a failed fact check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDiff {
    pub original: Vec<String>,
    pub simplified: Vec<String>,
}

/// Evidence for failed checks only. Passing checks leave their field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amounts: Option<TokenDiff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<TokenDiff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<TokenDiff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negation_flip: Option<String>,
}

impl CheckDetails {
    pub fn is_empty(&self) -> bool {
        self.amounts.is_none()
            && self.dates.is_none()
            && self.articles.is_none()
            && self.negation_flip.is_none()
    }

    pub fn diff(&self, category: TokenCategory) -> Option<&TokenDiff> {
        match category {
            TokenCategory::Amount => self.amounts.as_ref(),
            TokenCategory::Date => self.dates.as_ref(),
            TokenCategory::Article => self.articles.as_ref(),
        }
    }

    fn slot(&mut self, category: TokenCategory) -> &mut Option<TokenDiff> {
        match category {
            TokenCategory::Amount => &mut self.amounts,
            TokenCategory::Date => &mut self.dates,
            TokenCategory::Article => &mut self.articles,
        }
    }
}

/// Run every rule check. Never fails: text without tokens yields empty lists,
/// and two empty lists compare equal.
pub fn rule_checks(original: &str, simplified: &str) -> (CheckResult, CheckDetails) {
    let mut details = CheckDetails::default();
    let mut fact_ok = [true; 3];

    for (ok, category) in fact_ok.iter_mut().zip(TokenCategory::ALL) {
        let in_original = extract(original, category);
        let in_simplified = extract(simplified, category);
        *ok = equivalent(&in_original, &in_simplified);
        if !*ok {
            *details.slot(category) = Some(TokenDiff {
                original: in_original,
                simplified: in_simplified,
            });
        }
    }

    let negation_flip = detects_flip(original, simplified);
    if negation_flip {
        details.negation_flip = Some(NEGATION_NOTE.to_string());
    }

    let [amounts_ok, dates_ok, articles_ok] = fact_ok;
    let checks = CheckResult {
        amounts_ok,
        dates_ok,
        articles_ok,
        negation_flip,
    };
    debug!(?checks, "rule checks complete");
    (checks, details)
}
