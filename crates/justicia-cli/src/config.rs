//! Runtime settings: flags with environment fallbacks, and wiring them into
//! backends, the judge and the pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use justicia_ai::{
    ChatBackend, Embedder, EmbeddingProvider, Judge, JudgeConfig, OllamaBackend, OpenAiBackend,
    Pipeline, SimilarityScorer, Simplifier, Verifier, prompts,
};
use justicia_core::Thresholds;

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Ollama server used by the judge
    #[arg(long, env = "OLLAMA_BASE_URL", default_value = "http://localhost:11434", global = true)]
    pub ollama_url: String,

    /// Judge model name on the Ollama server
    #[arg(long, env = "OLLAMA_MODEL", default_value = "llama3", global = true)]
    pub judge_model: String,

    /// OpenAI-compatible endpoint used by the rewriter
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1", global = true)]
    pub openai_url: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini", global = true)]
    pub openai_model: String,

    /// Needed only for `process`
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_key: Option<String>,

    /// Directory with model.onnx and tokenizer.json
    #[arg(
        long,
        env = "JUSTICIA_MODEL_DIR",
        default_value = "models/paraphrase-multilingual-MiniLM-L12-v2",
        global = true
    )]
    pub model_dir: PathBuf,

    #[arg(long, env = "JUSTICIA_JUDGE_TIMEOUT", default_value_t = 180, global = true)]
    pub judge_timeout_secs: u64,

    #[arg(long, env = "JUSTICIA_SIMILARITY_TIMEOUT", default_value_t = 60, global = true)]
    pub similarity_timeout_secs: u64,

    /// Characters of each document shown to the judge (head and tail)
    #[arg(long, env = "JUSTICIA_EXCERPT_CHARS", default_value_t = 2000, global = true)]
    pub excerpt_chars: usize,

    #[arg(long, env = "JUSTICIA_JUDGE_NUM_CTX", default_value_t = 2048, global = true)]
    pub judge_num_ctx: u32,

    /// Replace the built-in judge protocol with the contents of this file
    #[arg(long, global = true)]
    pub judge_prompt: Option<PathBuf>,

    /// Replace the built-in rewriting instructions with the contents of this file
    #[arg(long, global = true)]
    pub simplify_prompt: Option<PathBuf>,

    #[arg(long, default_value_t = 0.80, global = true)]
    pub min_similarity: f64,

    #[arg(long, default_value_t = 90.0, global = true)]
    pub min_judge_score: f64,
}

impl Settings {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_similarity: self.min_similarity,
            min_judge_score: self.min_judge_score,
        }
    }

    fn judge_backend(&self) -> Arc<dyn ChatBackend> {
        Arc::new(
            OllamaBackend::new(&self.ollama_url, &self.judge_model)
                .with_num_ctx(self.judge_num_ctx)
                .with_timeout(Duration::from_secs(self.judge_timeout_secs)),
        )
    }

    fn rewrite_backend(&self) -> Arc<dyn ChatBackend> {
        Arc::new(OpenAiBackend::new(
            &self.openai_url,
            &self.openai_model,
            self.openai_key.clone(),
        ))
    }

    /// Lazily loaded: commands that never score similarity never touch the model.
    fn scorer(&self) -> SimilarityScorer {
        let dir = self.model_dir.clone();
        SimilarityScorer::lazy(move || {
            let embedder = Embedder::load(&dir)?;
            Ok(Arc::new(embedder) as Arc<dyn EmbeddingProvider>)
        })
        .with_timeout(Duration::from_secs(self.similarity_timeout_secs))
    }

    fn judge(&self) -> anyhow::Result<Judge> {
        let protocol = match &self.judge_prompt {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading judge prompt {}", path.display()))?,
            None => prompts::JUDGE_PROTOCOL.to_string(),
        };
        let config = JudgeConfig {
            excerpt_chars: self.excerpt_chars,
            timeout: Duration::from_secs(self.judge_timeout_secs),
            protocol,
            ..JudgeConfig::default()
        };
        Ok(Judge::new(self.judge_backend(), config))
    }

    pub fn verifier(&self) -> anyhow::Result<Verifier> {
        Ok(Verifier::new(self.scorer(), self.judge()?).with_thresholds(self.thresholds()))
    }

    pub fn pipeline(&self) -> anyhow::Result<Pipeline> {
        let mut simplifier = Simplifier::new(self.rewrite_backend());
        if let Some(path) = &self.simplify_prompt {
            let instructions = std::fs::read_to_string(path)
                .with_context(|| format!("reading simplify prompt {}", path.display()))?;
            simplifier = simplifier.with_instructions(instructions);
        }
        Ok(Pipeline::new(simplifier, self.verifier()?))
    }
}
