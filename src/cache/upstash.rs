//! Upstash Redis REST backend.
//!
//! Commands are issued as path segments: `GET {base}/get/{key}` answers
//! `{"result": "<value>"}` (or `null` on a miss), and `POST {base}/set/{key}`
//! stores the request body. See: <https://upstash.com/docs/redis/features/restapi>

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::CacheStore;
use crate::{AniranError, Result};

/// [`CacheStore`] over the Upstash REST API.
#[derive(Clone)]
pub struct UpstashStore {
    http: Client,
    base_url: String,
    token: String,
}

impl UpstashStore {
    /// Create a store for the given REST URL and token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Build `{base}/{command}/{key}`, percent-encoding the key as one segment.
    fn command_url(&self, command: &str, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AniranError::Configuration(format!("invalid cache URL {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AniranError::Configuration(format!("cache URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .push(command)
            .push(key);
        Ok(url)
    }
}

#[derive(Deserialize)]
struct GetResponse {
    result: Option<String>,
}

#[async_trait]
impl CacheStore for UpstashStore {
    fn name(&self) -> &str {
        "upstash"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let url = self.command_url("get", key)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| AniranError::CacheUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AniranError::CacheUnavailable(format!(
                "GET returned HTTP {status}"
            )));
        }

        let body: GetResponse = response
            .json()
            .await
            .map_err(|e| AniranError::CacheUnavailable(e.to_string()))?;
        Ok(body.result)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let url = self.command_url("set", key)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .body(value)
            .send()
            .await
            .map_err(|e| AniranError::CacheUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AniranError::CacheUnavailable(format!(
                "SET returned HTTP {status}"
            )));
        }
        Ok(())
    }
}
