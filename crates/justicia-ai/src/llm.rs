//! Chat-completion backends (Ollama, OpenAI-compatible) and JSON completion
//! with a single stricter retry.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Appended to the system prompt on the second attempt.
pub const STRICT_JSON_SUFFIX: &str = "\nDevuelve SOLO JSON válido. Sin comentarios.";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("no API key configured for {0}")]
    MissingApiKey(&'static str),
}

/// A language model that answers a system + user message pair with text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, system: &str, user: &str) -> Result<String, LlmError>;

    /// Provider and model, for logs and audit metadata.
    fn describe(&self) -> String;
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

fn messages<'a>(system: &'a str, user: &'a str) -> [Message<'a>; 2] {
    [
        Message {
            role: "system",
            content: system,
        },
        Message {
            role: "user",
            content: user,
        },
    ]
}

/// POST a JSON body and decode a JSON answer, mapping non-2xx and timeouts.
async fn post_json<B, R>(
    request: reqwest::RequestBuilder,
    body: &B,
    timeout: Duration,
) -> Result<R, LlmError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let resp = request
        .timeout(timeout)
        .json(body)
        .send()
        .await
        .map_err(|e| classify(e, timeout))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(LlmError::Server {
            status: status.as_u16(),
            body,
        });
    }
    resp.json().await.map_err(|e| classify(e, timeout))
}

fn classify(e: reqwest::Error, timeout: Duration) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout(timeout)
    } else {
        LlmError::Http(e)
    }
}

fn non_empty(content: Option<String>) -> Result<String, LlmError> {
    match content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(LlmError::EmptyResponse),
    }
}

// ── Ollama ──

/// Local Ollama server, `POST {base}/api/chat`.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    num_ctx: u32,
    num_predict: u32,
    timeout: Duration,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    options: OllamaOptions,
    stream: bool,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_ctx: u32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessage>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: Option<String>,
}

impl OllamaBackend {
    /// `base_url` should be like `http://localhost:11434` (no trailing slash).
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            num_ctx: 2048,
            num_predict: 512,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Context window. Smaller windows answer faster.
    pub fn with_num_ctx(mut self, num_ctx: u32) -> Self {
        self.num_ctx = num_ctx;
        self
    }

    pub fn with_num_predict(mut self, num_predict: u32) -> Self {
        self.num_predict = num_predict;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request<'a>(&'a self, system: &'a str, user: &'a str) -> OllamaRequest<'a> {
        OllamaRequest {
            model: &self.model,
            messages: messages(system, user),
            options: OllamaOptions {
                temperature: 0.0,
                num_ctx: self.num_ctx,
                num_predict: self.num_predict,
            },
            stream: false,
        }
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    async fn chat(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url);
        debug!(url = %url, model = %self.model, num_ctx = self.num_ctx, "ollama chat");
        let resp: OllamaResponse = post_json(
            self.client.post(&url),
            &self.request(system, user),
            self.timeout,
        )
        .await?;
        non_empty(resp.message.and_then(|m| m.content))
    }

    fn describe(&self) -> String {
        format!("ollama:{}", self.model)
    }
}

// ── OpenAI-compatible ──

/// OpenAI chat completions, `POST {base}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OllamaMessage,
}

impl OpenAiBackend {
    /// `base_url` should be like `https://api.openai.com/v1`.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn chat(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey("openai"))?;
        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "openai chat");
        let body = OpenAiRequest {
            model: &self.model,
            messages: messages(system, user),
            temperature: 0.0,
        };
        let resp: OpenAiResponse =
            post_json(self.client.post(&url).bearer_auth(key), &body, self.timeout).await?;
        non_empty(
            resp.choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content),
        )
    }

    fn describe(&self) -> String {
        format!("openai:{}", self.model)
    }
}

// ── Structured completion ──

#[derive(Error, Debug)]
pub enum StructuredError {
    #[error("model unavailable: {0}")]
    Unavailable(#[from] LlmError),
    #[error("unparseable structured output after retry: {0}")]
    Parse(String),
}

/// Ask for JSON and decode it as `T`, retrying once with [`STRICT_JSON_SUFFIX`].
///
/// Backend failures are returned immediately. Blank answers and decoding
/// failures retry.
pub async fn complete_structured<T: DeserializeOwned>(
    backend: &dyn ChatBackend,
    system: &str,
    user: &str,
) -> Result<T, StructuredError> {
    let strict = format!("{system}{STRICT_JSON_SUFFIX}");
    let mut last_error = String::new();

    for (attempt, prompt) in [system, strict.as_str()].into_iter().enumerate() {
        info!(backend = %backend.describe(), attempt = attempt + 1, "structured completion");
        let raw = match backend.chat(prompt, user).await {
            Ok(raw) => raw,
            Err(LlmError::EmptyResponse) => {
                warn!(attempt = attempt + 1, "model returned an empty answer");
                last_error = LlmError::EmptyResponse.to_string();
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<T>(strip_code_fence(&raw)) {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(attempt = attempt + 1, error = %e, "model output is not valid JSON for the schema");
                last_error = e.to_string();
            }
        }
    }

    Err(StructuredError::Parse(last_error))
}

/// Remove a surrounding Markdown code fence (```json ... ```), if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
