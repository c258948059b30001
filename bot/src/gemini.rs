//! Remote text-generation transport.
//!
//! The [`GenerateText`] trait is the seam between the grammar checker and
//! whatever produces model output: production uses [`GeminiClient`], a raw
//! HTTP client for the Generative Language `generateContent` endpoint, and
//! tests substitute stubs.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Header carrying the API key, per the Generative Language API.
const API_KEY_HEADER: &str = "X-goog-api-key";

/// Near-deterministic sampling; corrections should not vary between calls.
const TEMPERATURE: f64 = 0.2;

/// Output cap; a reply is one corrected sentence plus a short explanation.
const MAX_OUTPUT_TOKENS: u32 = 256;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Common interface for text-generation backends.
#[async_trait]
pub trait GenerateText: Send + Sync {
    /// Send one prompt, wait for the full textual response.
    ///
    /// An empty string is a valid success (the model produced no usable
    /// output); errors cover transport failures, non-2xx statuses, and
    /// unparseable responses.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Raw HTTP client for the Gemini generateContent endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(http: Client, api_key: String, endpoint: String) -> Self {
        Self {
            http,
            api_key,
            endpoint,
        }
    }
}

#[async_trait]
impl GenerateText for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = build_body(prompt);

        debug!(prompt_length = prompt.len(), "gemini_request_sending");

        let resp = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "gemini_api_error");
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| GenerateError::Parse(e.to_string()))?;

        let finish_reason = parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone());
        let text = response_text(parsed);

        if text.is_empty() {
            // Typically blocked content; the caller treats this as
            // "nothing to send", not as a failure.
            warn!(finish_reason = ?finish_reason, "gemini_empty_response");
        }

        Ok(text)
    }
}

/// Build the generateContent request body.
fn build_body(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "temperature": TEMPERATURE,
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
        },
    })
}

/// Join the text parts of the first candidate; empty when the response
/// carries no candidates, no parts, or no text.
fn response_text(response: GenerateResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

// ── Response types ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
