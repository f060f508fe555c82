//! Plain-language rewriting of a judgment.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::llm::{ChatBackend, LlmError};
use crate::prompts;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("rewriter unavailable: {0}")]
    Unavailable(#[from] LlmError),
    #[error("rewriter returned an empty text")]
    Empty,
}

pub struct Simplifier {
    backend: Arc<dyn ChatBackend>,
    instructions: String,
}

impl Simplifier {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            instructions: prompts::SIMPLIFY_INSTRUCTIONS.to_string(),
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Rewrite `original` in plain language. The whole judgment is sent.
    pub async fn rewrite(&self, original: &str) -> Result<String, RewriteError> {
        info!(backend = %self.backend.describe(), chars = original.chars().count(), "rewriting");
        let text = self.backend.chat(&self.instructions, original).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(RewriteError::Empty);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::tests::ScriptedBackend;

    #[tokio::test]
    async fn returns_trimmed_rewrite() {
        let backend = Arc::new(ScriptedBackend::ok(&["\n  El juzgado le da la razón.  \n"]));
        let simplifier = Simplifier::new(Arc::clone(&backend) as Arc<dyn ChatBackend>)
            .with_instructions("simplifica");
        let out = simplifier.rewrite("FALLO: estimo la demanda").await.unwrap();
        assert_eq!(out, "El juzgado le da la razón.");
        assert_eq!(backend.prompts.lock().unwrap()[0], "simplifica");
    }

    #[tokio::test]
    async fn backend_error_is_unavailable() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(LlmError::MissingApiKey("openai"))]));
        let err = Simplifier::new(backend).rewrite("texto").await.unwrap_err();
        assert!(matches!(err, RewriteError::Unavailable(LlmError::MissingApiKey(_))));
    }

    #[tokio::test]
    async fn blank_answer_is_empty() {
        let backend = Arc::new(ScriptedBackend::ok(&["   "]));
        let err = Simplifier::new(backend).rewrite("texto").await.unwrap_err();
        assert!(matches!(err, RewriteError::Empty));
    }
}
