//! Gemini generative-language API client.
//!
//! Translation requests ask for a strict JSON reply
//! (`responseMimeType: application/json`) and the completion text is parsed
//! into a [`TranslationCandidate`]. Failure responses are classified so the
//! orchestrator can decide whether a title-only retry is worthwhile.
//!
//! See: <https://ai.google.dev/api/generate-content>

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::traits::TranslationProvider;
use super::{ProxiedJson, error_message};
use crate::telemetry;
use crate::types::TranslationCandidate;
use crate::{AniranError, Result};

/// Default base URL for the Generative Language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used for translation and passthrough requests.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Message returned by the passthrough endpoint when no API key is set.
pub const MISSING_KEY_MESSAGE: &str = "Server is not configured with API Key.";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client with the given API key against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(Some(api_key.into()), DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    ///
    /// A client without a key still constructs; every call fails with
    /// [`AniranError::Configuration`].
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            http: Client::new(),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Use a different model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// The configured key, or the error every call fails with without one.
    pub fn require_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AniranError::Configuration(MISSING_KEY_MESSAGE.to_string()))
    }

    /// Translate a title (and optionally a synopsis) into Persian.
    pub async fn translate(
        &self,
        title: &str,
        synopsis: Option<&str>,
    ) -> Result<TranslationCandidate> {
        debug!(title, include_synopsis = synopsis.is_some(), "requesting translation");
        let payload = translation_payload(title, synopsis)?;
        let response = self.send(&payload).await?;
        let status = response.status();

        let body: Value = response.json().await.unwrap_or_else(|_| json!({}));

        if !status.is_success() {
            metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL,
                "service" => "gemini",
                "status" => "error",
            )
            .increment(1);
            warn!(status = status.as_u16(), body = %body, "gemini returned an error response");
            return Err(classify_error(status.as_u16(), &body));
        }

        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL,
            "service" => "gemini",
            "status" => "ok",
        )
        .increment(1);

        extract_candidate(&body)
    }

    /// Forward a `generateContent` request body verbatim and relay the reply.
    pub async fn generate_raw(&self, body: &Value) -> Result<ProxiedJson> {
        let response = self.send(body).await?;
        ProxiedJson::from_response(response).await
    }

    async fn send<T: Serialize + ?Sized>(&self, body: &T) -> Result<reqwest::Response> {
        let api_key = self.require_key()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }
}

// ============================================================================
// Request construction
// ============================================================================

#[derive(Serialize)]
struct TranslationRequest<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    synopsis: Option<&'a str>,
}

/// Build the prompt text. Title-only requests ask for fewer keys.
pub(crate) fn build_prompt(title: &str, synopsis: Option<&str>) -> Result<String> {
    let keys = if synopsis.is_some() {
        r#""persian_title" and "persian_synopsis""#
    } else {
        r#""persian_title""#
    };
    let details = serde_json::to_string_pretty(&TranslationRequest { title, synopsis })?;
    Ok(format!(
        "Translate the following anime details to Persian. \
         Return ONLY a JSON object with keys {keys}.\n{details}"
    ))
}

fn translation_payload(title: &str, synopsis: Option<&str>) -> Result<Value> {
    let prompt = build_prompt(title, synopsis)?;
    Ok(json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": { "responseMimeType": "application/json" }
    }))
}

// ============================================================================
// Response classification
// ============================================================================

/// Map a non-success response to an error.
///
/// Rate limiting wins over block reasons; anything unrecognised is an
/// `Upstream` error carrying the status.
pub(crate) fn classify_error(status: u16, body: &Value) -> AniranError {
    let message = error_message(body);

    let exhausted = message
        .as_deref()
        .is_some_and(|m| m.to_ascii_lowercase().contains("resource exhausted"))
        || body.pointer("/error/status").and_then(Value::as_str) == Some("RESOURCE_EXHAUSTED");
    if status == 429 || exhausted {
        return AniranError::RateLimited;
    }

    if let Some(reason) = block_reason(body) {
        return AniranError::ContentBlocked {
            reason: reason.to_string(),
        };
    }

    AniranError::Upstream {
        status,
        message: format!(
            "Gemini API error ({status}): {}",
            message.unwrap_or_else(|| "unknown error".to_string())
        ),
    }
}

/// Pull the candidate out of a success response.
pub(crate) fn extract_candidate(body: &Value) -> Result<TranslationCandidate> {
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty());

    if let Some(text) = text {
        return parse_candidate(text);
    }

    if let Some(reason) = block_reason(body) {
        warn!(reason, "gemini blocked the prompt");
        return Err(AniranError::ContentBlocked {
            reason: reason.to_string(),
        });
    }

    Err(AniranError::MalformedResponse(
        "no text in Gemini response".to_string(),
    ))
}

/// Parse completion text as a candidate, tolerating a markdown code fence.
pub(crate) fn parse_candidate(text: &str) -> Result<TranslationCandidate> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(unfenced)
        .map_err(|e| AniranError::MalformedResponse(format!("translation is not valid JSON: {e}")))
}

fn block_reason(body: &Value) -> Option<&str> {
    body.pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
}

// ============================================================================
// Provider Trait Implementation
// ============================================================================

#[async_trait]
impl TranslationProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn translate(
        &self,
        title: &str,
        synopsis: Option<&str>,
    ) -> Result<TranslationCandidate> {
        GeminiClient::translate(self, title, synopsis).await
    }
}
