//! LLM judge for legal equivalence.
//!
//! The judge never fails from the caller's point of view: any backend error,
//! timeout or unparseable answer becomes the pessimistic verdict, which the
//! decision gate always rejects.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use justicia_core::JudgeVerdict;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm::{ChatBackend, StructuredError, complete_structured};
use crate::prompts::{self, GUIDE_SLOT, ORIGINAL_SLOT, SIMPLIFIED_SLOT};

const ELISION: &str = "\n[... texto intermedio omitido ...]\n";

#[derive(Error, Debug)]
pub enum JudgeError {
    #[error(transparent)]
    Structured(#[from] StructuredError),
    #[error("judge timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Characters kept from the head (and tail) of each document.
    pub excerpt_chars: usize,
    pub timeout: Duration,
    pub protocol: String,
    /// Custom writing guide; empty keeps the protocol's default nine points.
    pub guide: String,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            excerpt_chars: 2000,
            timeout: Duration::from_secs(180),
            protocol: prompts::JUDGE_PROTOCOL.to_string(),
            guide: String::new(),
        }
    }
}

pub struct Judge {
    backend: Arc<dyn ChatBackend>,
    config: JudgeConfig,
}

impl Judge {
    pub fn new(backend: Arc<dyn ChatBackend>, config: JudgeConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &dyn ChatBackend {
        self.backend.as_ref()
    }

    /// The system message sent to the model for this pair.
    pub fn render(&self, original: &str, simplified: &str) -> String {
        let w = self.config.excerpt_chars;
        prompts::render(
            &self.config.protocol,
            &[
                (ORIGINAL_SLOT, &*excerpt(original, w)),
                (SIMPLIFIED_SLOT, &*excerpt(simplified, w)),
                (GUIDE_SLOT, self.config.guide.as_str()),
            ],
        )
    }

    /// Judge the pair, surfacing every failure.
    pub async fn try_judge(
        &self,
        original: &str,
        simplified: &str,
    ) -> Result<JudgeVerdict, JudgeError> {
        let system = self.render(original, simplified);
        let call = complete_structured::<JudgeVerdict>(self.backend.as_ref(), &system, "");
        let verdict = tokio::time::timeout(self.config.timeout, call)
            .await
            .map_err(|_| JudgeError::Timeout(self.config.timeout))??;
        Ok(verdict)
    }

    /// Judge the pair, degrading every failure to [`JudgeVerdict::pessimistic`].
    pub async fn judge(&self, original: &str, simplified: &str) -> JudgeVerdict {
        match self.try_judge(original, simplified).await {
            Ok(verdict) => {
                info!(backend = %self.backend.describe(), verdict = verdict.label(), "judge answered");
                verdict
            }
            Err(e) => {
                warn!(backend = %self.backend.describe(), error = %e, "judge failed, using pessimistic verdict");
                JudgeVerdict::pessimistic(&e.to_string())
            }
        }
    }
}

/// Shorten a document for the judge's context window, counting characters.
///
/// Up to `window` chars: unchanged. Up to twice that: the head plus `...`.
/// Longer: head and tail joined by an elision marker.
pub fn excerpt(text: &str, window: usize) -> Cow<'_, str> {
    let len = text.chars().count();
    if len <= window {
        return Cow::Borrowed(text);
    }
    let head = char_prefix(text, window);
    if len <= window.saturating_mul(2) {
        return Cow::Owned(format!("{head}..."));
    }
    let tail = char_suffix(text, window);
    Cow::Owned(format!("{head}{ELISION}{tail}"))
}

fn char_prefix(text: &str, n: usize) -> &str {
    text.char_indices()
        .nth(n)
        .map_or(text, |(idx, _)| &text[..idx])
}

fn char_suffix(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    text.char_indices()
        .rev()
        .nth(n - 1)
        .map_or(text, |(idx, _)| &text[idx..])
}
