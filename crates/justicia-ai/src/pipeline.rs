//! Verification and the full rewrite-then-verify pipeline.

use justicia_core::{
    AuditRecord, Decision, DocumentPair, SimplifyResult, Thresholds, clean, round3, rule_checks,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::judge::Judge;
use crate::similarity::SimilarityScorer;
use crate::simplify::{RewriteError, Simplifier};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("document has no text")]
    EmptyDocument,
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

/// Evidence plus the gate's decision for one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub result: SimplifyResult,
    pub decision: Decision,
}

impl Verification {
    pub fn accepted(&self) -> bool {
        self.decision.accepted
    }

    pub fn into_record(self, source: Option<String>, processed_at: String) -> AuditRecord {
        AuditRecord {
            result: self.result,
            decision: self.decision,
            source,
            processed_at,
        }
    }
}

pub struct Verifier {
    scorer: SimilarityScorer,
    judge: Judge,
    thresholds: Thresholds,
}

impl Verifier {
    pub fn new(scorer: SimilarityScorer, judge: Judge) -> Self {
        Self {
            scorer,
            judge,
            thresholds: Thresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Rule checks, similarity and the judge, then the decision gate.
    ///
    /// Never fails: similarity errors score 0.0 and are recorded, judge
    /// errors yield the pessimistic verdict.
    pub async fn verify(&self, pair: &DocumentPair) -> Verification {
        let (original, simplified) = (pair.original(), pair.simplified());
        let (checks, details) = rule_checks(original, simplified);

        let (similarity, judge) = tokio::join!(
            self.scorer.score(original, simplified),
            self.judge.judge(original, simplified),
        );

        let (similarity, similarity_error) = match similarity {
            Ok(score) => (round3(score), None),
            Err(e) => {
                warn!(error = %e, "similarity unavailable, scoring 0.0");
                (0.0, Some(e.to_string()))
            }
        };

        let decision =
            self.thresholds
                .evaluate(&checks, similarity, similarity_error.as_deref(), &judge);
        info!(
            accepted = decision.accepted,
            similarity,
            verdict = judge.label(),
            reasons = decision.reasons.len(),
            "verification complete"
        );

        Verification {
            result: SimplifyResult {
                original: original.to_string(),
                simplified: simplified.to_string(),
                checks,
                details,
                similarity,
                similarity_error,
                judge,
            },
            decision,
        }
    }
}

pub struct Pipeline {
    simplifier: Simplifier,
    verifier: Verifier,
}

impl Pipeline {
    pub fn new(simplifier: Simplifier, verifier: Verifier) -> Self {
        Self {
            simplifier,
            verifier,
        }
    }

    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }

    /// Clean, rewrite, verify. Only a rewriter failure is an error.
    pub async fn process_text(&self, text: &str) -> Result<Verification, PipelineError> {
        let original = clean(text);
        if original.is_empty() {
            return Err(PipelineError::EmptyDocument);
        }
        let simplified = self.simplifier.rewrite(&original).await?;
        Ok(self
            .verifier
            .verify(&DocumentPair::new(original, simplified))
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::JudgeConfig;
    use crate::llm::tests::ScriptedBackend;
    use crate::llm::{ChatBackend, LlmError};
    use crate::similarity::tests::BagOfWords;
    use justicia_core::RejectReason;
    use std::sync::Arc;

    const ORIGINAL: &str = "FALLO: Se condena a la demandada al pago de 1.500,00 € \
        más intereses desde el 11/02/2025, conforme al art. 1101 CC.";
    const FAITHFUL: &str = "FALLO: Se condena a la demandada al pago de 1.500,00 € \
        más intereses desde el 11/02/2025, según el art. 1101 CC.";

    const ACCEPT: &str =
        r#"{"veredicto": "ACEPTAR", "equivalencia_juridica": {"puntaje_0_100": 95}}"#;

    fn verifier(judge_answers: &[&str]) -> Verifier {
        let judge = Judge::new(
            Arc::new(ScriptedBackend::ok(judge_answers)),
            JudgeConfig::default(),
        );
        Verifier::new(SimilarityScorer::with_provider(Arc::new(BagOfWords)), judge)
    }

    #[tokio::test]
    async fn faithful_rewrite_is_accepted() {
        let v = verifier(&[ACCEPT]).verify(&DocumentPair::new(ORIGINAL, FAITHFUL)).await;
        assert!(v.accepted(), "{:?}", v.decision);
        assert!(v.result.similarity >= 0.8);
        assert!(v.result.similarity_error.is_none());
    }

    #[tokio::test]
    async fn changed_amount_rejects_despite_judge() {
        let altered = FAITHFUL.replace("1.500,00 €", "1.050,00 €");
        let v = verifier(&[ACCEPT]).verify(&DocumentPair::new(ORIGINAL, altered)).await;
        assert!(!v.accepted());
        assert!(v.decision.reasons.contains(&RejectReason::AmountsMismatch));
        assert!(v.result.details.amounts.is_some());
    }

    #[tokio::test]
    async fn judge_failure_rejects() {
        let v = verifier(&["no json", "no json"])
            .verify(&DocumentPair::new(ORIGINAL, FAITHFUL))
            .await;
        assert!(!v.accepted());
        assert!(v.result.judge.summary().starts_with("Error en validación"));
    }

    #[tokio::test]
    async fn similarity_failure_is_recorded() {
        let judge = Judge::new(Arc::new(ScriptedBackend::ok(&[ACCEPT])), JudgeConfig::default());
        let scorer = SimilarityScorer::lazy(|| anyhow::bail!("model.onnx not found"));
        let v = Verifier::new(scorer, judge)
            .verify(&DocumentPair::new(ORIGINAL, FAITHFUL))
            .await;

        assert_eq!(v.result.similarity, 0.0);
        assert!(v.result.similarity_error.as_deref().unwrap().contains("model.onnx"));
        assert!(matches!(
            v.decision.reasons.as_slice(),
            [RejectReason::SimilarityUnavailable { .. }]
        ));
    }

    #[tokio::test]
    async fn similarity_is_rounded() {
        let v = verifier(&[ACCEPT])
            .verify(&DocumentPair::new(ORIGINAL, "FALLO: condena al pago."))
            .await;
        let s = v.result.similarity;
        assert_eq!(s, round3(s));
    }

    #[tokio::test]
    async fn process_text_cleans_then_rewrites() {
        let rewriter = Arc::new(ScriptedBackend::ok(&[FAITHFUL]));
        let pipeline = Pipeline::new(
            Simplifier::new(Arc::clone(&rewriter) as Arc<dyn ChatBackend>),
            verifier(&[ACCEPT]),
        );
        let messy = ORIGINAL.replace(' ', "\u{a0}\t ");
        let v = pipeline.process_text(&messy).await.unwrap();
        assert_eq!(v.result.original, ORIGINAL);
        assert_eq!(v.result.simplified, FAITHFUL);
        assert!(v.accepted());
    }

    #[tokio::test]
    async fn rewriter_failure_propagates() {
        let rewriter = Arc::new(ScriptedBackend::new(vec![Err(LlmError::Server {
            status: 401,
            body: "invalid key".into(),
        })]));
        let pipeline = Pipeline::new(Simplifier::new(rewriter), verifier(&[]));
        let err = pipeline.process_text(ORIGINAL).await.unwrap_err();
        assert!(matches!(err, PipelineError::Rewrite(RewriteError::Unavailable(_))));
    }

    #[tokio::test]
    async fn blank_document_is_rejected_before_rewriting() {
        let rewriter = Arc::new(ScriptedBackend::ok(&[]));
        let pipeline = Pipeline::new(
            Simplifier::new(Arc::clone(&rewriter) as Arc<dyn ChatBackend>),
            verifier(&[]),
        );
        let err = pipeline.process_text(" \t\u{a0}").await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDocument));
        assert_eq!(rewriter.calls(), 0);
    }

    #[tokio::test]
    async fn into_record_keeps_decision() {
        let v = verifier(&[ACCEPT]).verify(&DocumentPair::new(ORIGINAL, FAITHFUL)).await;
        let record = v.clone().into_record(Some("s.txt".into()), "2025-01-01T00:00:00Z".into());
        assert_eq!(record.decision, v.decision);
        assert_eq!(record.result, v.result);
    }
}
