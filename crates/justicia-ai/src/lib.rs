//! Model-backed verification: embedding similarity, the LLM judge, the
//! plain-language rewriter and the pipeline that combines them with the
//! deterministic checks from `justicia-core`.

#[cfg(feature = "onnx")]
mod embedder;
pub mod judge;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod similarity;
pub mod simplify;

#[cfg(feature = "onnx")]
pub use embedder::Embedder;
pub use judge::{Judge, JudgeConfig, JudgeError};
pub use llm::{
    ChatBackend, LlmError, OllamaBackend, OpenAiBackend, StructuredError, complete_structured,
};
pub use pipeline::{Pipeline, PipelineError, Verification, Verifier};
pub use similarity::{EmbeddingProvider, SimilarityError, SimilarityScorer, cosine_similarity};
pub use simplify::{RewriteError, Simplifier};
