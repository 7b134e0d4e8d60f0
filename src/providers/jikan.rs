//! Jikan (unofficial MyAnimeList) API client.
//!
//! See: <https://docs.api.jikan.moe/>

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::MetadataProvider;
use super::{ProxiedJson, error_message};
use crate::telemetry;
use crate::types::AnimeRecord;
use crate::{AniranError, Result};

/// Default base URL for the Jikan v4 API
pub const DEFAULT_BASE_URL: &str = "https://api.jikan.moe/v4";

/// User agent sent on proxied requests.
const USER_AGENT: &str = "Aniran-App-Serverless-Proxy";

/// Client for the Jikan metadata API.
#[derive(Clone)]
pub struct JikanClient {
    http: Client,
    base_url: String,
}

impl JikanClient {
    /// Create a client against the public Jikan API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetch `/anime/{id}/full` and unwrap its `data` envelope.
    pub async fn fetch_anime(&self, id: &str) -> Result<AnimeRecord> {
        let url = self.anime_url(id)?;
        debug!(%url, "fetching anime from jikan");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL,
                "service" => "jikan",
                "status" => "error",
            )
            .increment(1);
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            warn!(id, status = status.as_u16(), %message, "jikan request failed");
            return Err(AniranError::Upstream {
                status: status.as_u16(),
                message: format!("Jikan API error: {message}"),
            });
        }

        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL,
            "service" => "jikan",
            "status" => "ok",
        )
        .increment(1);

        let envelope: Envelope = response.json().await?;
        Ok(envelope.data)
    }

    /// Forward `GET {base}/{endpoint}` and relay status and JSON body.
    ///
    /// `endpoint` is appended verbatim, query string included.
    pub async fn proxy(&self, endpoint: &str) -> Result<ProxiedJson> {
        if endpoint.is_empty() {
            return Err(AniranError::BadRequest("No endpoint provided".into()));
        }
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        debug!(%url, "proxying jikan request");

        let response = self.http.get(&url).send().await?;
        ProxiedJson::from_response(response).await
    }

    fn anime_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AniranError::Configuration(format!("invalid Jikan URL {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AniranError::Configuration(format!("Jikan URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .push("anime")
            .push(id)
            .push("full");
        Ok(url)
    }
}

impl Default for JikanClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct Envelope {
    data: AnimeRecord,
}

// ============================================================================
// Provider Trait Implementation
// ============================================================================

#[async_trait]
impl MetadataProvider for JikanClient {
    fn name(&self) -> &str {
        "jikan"
    }

    async fn fetch_anime(&self, id: &str) -> Result<AnimeRecord> {
        JikanClient::fetch_anime(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anime_url_keeps_base_path() {
        let client = JikanClient::new();
        let url = client.anime_url("5114").unwrap();
        assert_eq!(url.as_str(), "https://api.jikan.moe/v4/anime/5114/full");
    }

    #[test]
    fn anime_url_escapes_id() {
        let client = JikanClient::with_base_url("http://localhost:1234/");
        let url = client.anime_url("1/../2").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/anime/1%2F..%2F2/full");
    }

    #[tokio::test]
    async fn proxy_rejects_empty_endpoint() {
        let client = JikanClient::new();
        let err = client.proxy("").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
