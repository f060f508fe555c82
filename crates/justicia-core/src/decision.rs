//! The accept/reject gate.
//!
//! Acceptance is conjunctive. Every fact check must pass, no negation flip may
//! be flagged, similarity must reach the threshold and the judge must lean
//! accept with a score (when it gives one) at or above the minimum. One failing
//! condition rejects the document regardless of the others.

use serde::{Deserialize, Serialize};

use crate::checks::CheckResult;
use crate::verdict::{Assessment, JudgeVerdict, Lean};

/// Why a document was rejected. A rejection always carries at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    AmountsMismatch,
    DatesMismatch,
    ArticlesMismatch,
    NegationFlip,
    LowSimilarity { score: f64, threshold: f64 },
    SimilarityUnavailable { error: String },
    JudgeRejected { verdict: String },
    JudgeScoreBelow { score: f64, threshold: f64 },
}

/// Gate outcome plus the reasons behind a rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<RejectReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub min_similarity: f64,
    pub min_judge_score: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_similarity: 0.80,
            min_judge_score: 90.0,
        }
    }
}

impl Thresholds {
    /// Evaluate every condition and collect the failing ones.
    ///
    /// `similarity_error` is set when the score could not be computed; the
    /// score is then 0.0 and the error is reported instead of a low score.
    pub fn evaluate(
        &self,
        checks: &CheckResult,
        similarity: f64,
        similarity_error: Option<&str>,
        verdict: &JudgeVerdict,
    ) -> Decision {
        let mut reasons = Vec::new();

        if !checks.amounts_ok {
            reasons.push(RejectReason::AmountsMismatch);
        }
        if !checks.dates_ok {
            reasons.push(RejectReason::DatesMismatch);
        }
        if !checks.articles_ok {
            reasons.push(RejectReason::ArticlesMismatch);
        }
        if checks.negation_flip {
            reasons.push(RejectReason::NegationFlip);
        }

        match similarity_error {
            Some(error) => reasons.push(RejectReason::SimilarityUnavailable {
                error: error.to_string(),
            }),
            // NaN fails this comparison and is rejected.
            None if !(similarity >= self.min_similarity) => {
                reasons.push(RejectReason::LowSimilarity {
                    score: similarity,
                    threshold: self.min_similarity,
                })
            }
            None => {}
        }

        reasons.extend(self.judge_reasons(&verdict.assessment(), verdict.label()));

        Decision {
            accepted: reasons.is_empty(),
            reasons,
        }
    }

    fn judge_reasons(&self, assessment: &Assessment, label: &str) -> Vec<RejectReason> {
        let mut reasons = Vec::new();
        if assessment.lean == Lean::Reject {
            reasons.push(RejectReason::JudgeRejected {
                verdict: label.to_string(),
            });
        }
        if let Some(score) = assessment.score
            && score < self.min_judge_score
        {
            reasons.push(RejectReason::JudgeScoreBelow {
                score,
                threshold: self.min_judge_score,
            });
        }
        reasons
    }
}

/// Accept/reject with the default thresholds.
pub fn decide(checks: &CheckResult, similarity: f64, verdict: &JudgeVerdict) -> bool {
    Thresholds::default()
        .evaluate(checks, similarity, None, verdict)
        .accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn all_pass() -> CheckResult {
        CheckResult {
            amounts_ok: true,
            dates_ok: true,
            articles_ok: true,
            negation_flip: false,
        }
    }

    fn verdict(value: serde_json::Value) -> JudgeVerdict {
        JudgeVerdict::from_value(value).unwrap()
    }

    #[test]
    fn accepts_when_everything_passes() {
        assert!(decide(&all_pass(), 0.85, &verdict(json!({"verdict": "equivalent"}))));
    }

    #[test]
    fn judge_mismatch_rejects() {
        assert!(!decide(&all_pass(), 0.85, &verdict(json!({"verdict": "mismatch"}))));
    }

    #[test]
    fn single_rule_failure_is_a_hard_gate() {
        let checks = CheckResult {
            amounts_ok: false,
            ..all_pass()
        };
        let judge = verdict(json!({"veredicto": "ACEPTAR",
                                   "equivalencia_juridica": {"puntaje_0_100": 98}}));
        let decision = Thresholds::default().evaluate(&checks, 0.95, None, &judge);
        assert!(!decision.accepted);
        assert_eq!(decision.reasons, vec![RejectReason::AmountsMismatch]);
    }

    #[test]
    fn negation_flip_rejects() {
        let checks = CheckResult {
            negation_flip: true,
            ..all_pass()
        };
        assert!(!decide(&checks, 0.99, &verdict(json!({"verdict": "equivalent"}))));
    }

    #[test]
    fn similarity_threshold_is_inclusive() {
        let judge = verdict(json!({"verdict": "minor_diffs"}));
        assert!(decide(&all_pass(), 0.80, &judge));
        assert!(!decide(&all_pass(), 0.799, &judge));
    }

    #[test]
    fn nan_similarity_rejects() {
        assert!(!decide(&all_pass(), f64::NAN, &verdict(json!({"verdict": "equivalent"}))));
    }

    #[test]
    fn rich_score_below_minimum_overrides_accept() {
        let judge = verdict(json!({"veredicto": "ACEPTAR",
                                   "equivalencia_juridica": {"puntaje_0_100": 85}}));
        let decision = Thresholds::default().evaluate(&all_pass(), 0.9, None, &judge);
        assert!(!decision.accepted);
        assert_eq!(
            decision.reasons,
            vec![RejectReason::JudgeScoreBelow {
                score: 85.0,
                threshold: 90.0
            }]
        );
    }

    #[test]
    fn rich_accept_without_score() {
        assert!(decide(&all_pass(), 0.9, &verdict(json!({"veredicto": "ACEPTAR"}))));
    }

    #[test]
    fn rich_accept_at_ninety() {
        let judge = verdict(json!({"veredicto": "ACEPTAR",
                                   "equivalencia_juridica": {"puntaje_0_100": 90}}));
        assert!(decide(&all_pass(), 0.9, &judge));
    }

    #[test]
    fn pessimistic_default_rejects() {
        let judge = JudgeVerdict::pessimistic("invalid JSON twice");
        let decision = Thresholds::default().evaluate(&all_pass(), 0.99, None, &judge);
        assert!(!decision.accepted);
        assert!(decision.reasons.contains(&RejectReason::JudgeRejected {
            verdict: "RECHAZAR".into()
        }));
    }

    #[test]
    fn similarity_error_replaces_low_score_reason() {
        let judge = verdict(json!({"verdict": "equivalent"}));
        let decision =
            Thresholds::default().evaluate(&all_pass(), 0.0, Some("embedding timed out"), &judge);
        assert_eq!(
            decision.reasons,
            vec![RejectReason::SimilarityUnavailable {
                error: "embedding timed out".into()
            }]
        );
    }

    #[test]
    fn collects_every_failing_reason() {
        let checks = CheckResult {
            amounts_ok: false,
            dates_ok: false,
            articles_ok: false,
            negation_flip: true,
        };
        let judge = JudgeVerdict::pessimistic("down");
        let decision = Thresholds::default().evaluate(&checks, 0.1, None, &judge);
        assert_eq!(decision.reasons.len(), 7);
    }

    #[test]
    fn custom_thresholds() {
        let lenient = Thresholds {
            min_similarity: 0.5,
            min_judge_score: 80.0,
        };
        let judge = verdict(json!({"veredicto": "ACEPTAR",
                                   "equivalencia_juridica": {"puntaje_0_100": 85}}));
        assert!(lenient.evaluate(&all_pass(), 0.6, None, &judge).accepted);
    }

    #[test]
    fn reasons_serialize_tagged() {
        let json = serde_json::to_value(RejectReason::LowSimilarity {
            score: 0.5,
            threshold: 0.8,
        })
        .unwrap();
        assert_eq!(json, json!({"reason": "low_similarity", "score": 0.5, "threshold": 0.8}));
    }
}
