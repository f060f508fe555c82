//! Semantic similarity between an original judgment and its rewrite.
//!
//! The embedding model is loaded lazily on first use and shared by every
//! later call. Scoring runs on the blocking pool under a timeout.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Produces sentence embeddings. Implementations may block.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    /// One vector per input, in order.
    fn embed_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn model_id(&self) -> &str;
}

#[derive(Error, Debug)]
pub enum SimilarityError {
    #[error("embedding model unavailable: {0}")]
    Load(String),
    #[error("embedding failed: {0}")]
    Embed(String),
    #[error("similarity timed out after {0:?}")]
    Timeout(Duration),
    #[error("embedding task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

type Loader = dyn Fn() -> anyhow::Result<Arc<dyn EmbeddingProvider>> + Send + Sync;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Cosine similarity scorer backed by a lazily loaded embedding model.
pub struct SimilarityScorer {
    provider: OnceCell<Arc<dyn EmbeddingProvider>>,
    loader: Option<Arc<Loader>>,
    timeout: Duration,
}

impl SimilarityScorer {
    /// Defer loading until the first non-empty comparison.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn lazy<F>(loader: F) -> Self
    where
        F: Fn() -> anyhow::Result<Arc<dyn EmbeddingProvider>> + Send + Sync + 'static,
    {
        Self {
            provider: OnceCell::new(),
            loader: Some(Arc::new(loader)),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use an already constructed provider.
    pub fn with_provider(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider: OnceCell::new_with(Some(provider)),
            loader: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// True once the model has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.provider.initialized()
    }

    async fn provider(&self) -> Result<Arc<dyn EmbeddingProvider>, SimilarityError> {
        let provider = self
            .provider
            .get_or_try_init(|| async {
                let loader = self
                    .loader
                    .clone()
                    .ok_or_else(|| SimilarityError::Load("no embedding model configured".into()))?;
                let provider = tokio::task::spawn_blocking(move || loader())
                    .await?
                    .map_err(|e| SimilarityError::Load(format!("{e:#}")))?;
                info!(model = provider.model_id(), "embedding model ready");
                Ok::<_, SimilarityError>(provider)
            })
            .await?;
        Ok(Arc::clone(provider))
    }

    /// Cosine similarity of the two texts' embeddings.
    ///
    /// Returns 0.0 without touching the model when either text is blank. The
    /// timeout covers the first model load as well as the embedding.
    pub async fn score(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        if a.trim().is_empty() || b.trim().is_empty() {
            return Ok(0.0);
        }

        let work = async {
            let provider = self.provider().await?;
            let texts = [a.to_owned(), b.to_owned()];
            tokio::task::spawn_blocking(move || {
                provider.embed_batch(&[texts[0].as_str(), texts[1].as_str()])
            })
            .await?
            .map_err(|e| SimilarityError::Embed(format!("{e:#}")))
        };

        let vectors = tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| SimilarityError::Timeout(self.timeout))??;

        let [va, vb]: [Vec<f32>; 2] = vectors.try_into().map_err(|v: Vec<Vec<f32>>| {
            SimilarityError::Embed(format!("expected 2 embeddings, got {}", v.len()))
        })?;
        let score = cosine_similarity(&va, &vb).ok_or_else(|| {
            SimilarityError::Embed(format!(
                "dimension mismatch: {} vs {}",
                va.len(),
                vb.len()
            ))
        })?;
        debug!(score, "similarity computed");
        Ok(score)
    }
}

/// Cosine similarity in f64, clamped to [-1, 1].
///
/// `None` when dimensions differ; 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return Some(0.0);
    }
    Some((dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0))
}
