//! Gemini `generateContent` client with a hard per-call timeout.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use contralex_core::{AnalysisConfig, char_len, truncate_chars};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Appended to text cut by [`truncate_if_needed`].
pub const TRUNCATION_MARKER: &str = "\n\n[TEXTO TRUNCADO]";

/// Share of the token budget the prompt may use; the rest is left for the response.
pub const PROMPT_BUDGET_SHARE: f64 = 0.6;

/// Rough characters-per-token ratio used for budget estimates.
pub const CHARS_PER_TOKEN: usize = 4;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response contained no generated text")]
    EmptyResponse,
    #[error("no Gemini API key configured")]
    MissingApiKey,
}

/// Header carrying the API key, so it never appears in request URLs or in
/// transport errors built from them.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// One remote text-generation call.
///
/// Implementations fail with [`GenerationError`] rather than returning empty
/// text, and never retry internally.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

// ── Wire types ──

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub top_k: u32,
    pub top_p: f64,
}

impl GenerationConfig {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            top_k: config.top_k,
            top_p: config.top_p,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

impl GenerateResponse {
    /// Text of the first candidate's first part.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// ── Client ──

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    generation: GenerationConfig,
    timeout: Duration,
}

impl GeminiClient {
    /// Build a client from the analysis configuration.
    ///
    /// A missing API key is only reported when [`generate`](TextGenerator::generate)
    /// is called, so rules-only setups can still construct the client.
    pub fn new(config: &AnalysisConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            generation: GenerationConfig::from_config(config),
            timeout: config.call_timeout(),
        })
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    pub fn generation_config(&self) -> GenerationConfig {
        self.generation
    }

    async fn send(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: self.generation,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let raw = resp.text().await.map_err(reqwest::Error::without_url)?;
        let parsed: GenerateResponse = serde_json::from_str(&raw)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "token usage"
            );
        }
        if let Some(reason) = parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!(finish_reason = reason, "candidate finished");
        }

        parsed.into_text().ok_or(GenerationError::EmptyResponse)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        info!(model = %self.model, prompt_chars = char_len(prompt), "calling Gemini");
        let started = Instant::now();

        // Dropping the request future on timeout aborts the connection.
        let text = tokio::time::timeout(self.timeout, self.send(prompt))
            .await
            .map_err(|_| {
                warn!(timeout = ?self.timeout, "Gemini call timed out");
                GenerationError::Timeout(self.timeout)
            })??;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_chars = char_len(&text),
            "Gemini response received"
        );
        debug!(response = %text, "raw generation");
        Ok(text)
    }
}

// ── Size helpers ──

/// Cut `text` to `max_chars` characters and append [`TRUNCATION_MARKER`], or
/// return it unchanged when it already fits.
pub fn truncate_if_needed(text: &str, max_chars: usize) -> Cow<'_, str> {
    match truncate_chars(text, max_chars) {
        Some(head) => {
            warn!(from = char_len(text), to = max_chars, "text truncated");
            Cow::Owned(format!("{head}{TRUNCATION_MARKER}"))
        }
        None => Cow::Borrowed(text),
    }
}

/// Whether `text` fits in [`PROMPT_BUDGET_SHARE`] of a token budget, at
/// roughly [`CHARS_PER_TOKEN`] characters per token.
pub fn estimate_within_budget(text: &str, max_tokens_budget: u32) -> bool {
    let estimated_tokens = char_len(text) / CHARS_PER_TOKEN;
    estimated_tokens as f64 <= f64::from(max_tokens_budget) * PROMPT_BUDGET_SHARE
}
