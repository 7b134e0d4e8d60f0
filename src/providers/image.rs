//! Image passthrough restricted to an allow-list of CDN hosts.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::telemetry;
use crate::{AniranError, Result};

/// Hosts images may be fetched from by default.
pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &["cdn.myanimelist.net", "img.youtube.com"];

/// `Cache-Control` value attached to successfully proxied images (one day).
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=86400";

/// Raw upstream image response.
#[derive(Debug, Clone)]
pub struct ProxiedImage {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ProxiedImage {
    /// Whether the upstream reported success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches images on behalf of the browser, refusing hosts off the allow-list.
#[derive(Clone)]
pub struct ImageProxy {
    http: Client,
    allowed_hosts: Vec<String>,
}

impl ImageProxy {
    /// Proxy for the default CDN hosts.
    pub fn new() -> Self {
        Self::with_allowed_hosts(DEFAULT_ALLOWED_HOSTS.iter().copied())
    }

    /// Proxy for a custom host list.
    pub fn with_allowed_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            http: Client::new(),
            allowed_hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    /// Validate `raw_url` against the allow-list without fetching it.
    pub fn check(&self, raw_url: &str) -> Result<Url> {
        if raw_url.is_empty() {
            return Err(AniranError::BadRequest("No image URL provided".into()));
        }
        let url = Url::parse(raw_url)
            .map_err(|e| AniranError::BadRequest(format!("Invalid image URL: {e}")))?;

        let allowed = url
            .host_str()
            .is_some_and(|host| self.allowed_hosts.iter().any(|h| h == host));
        if !allowed {
            warn!(url = raw_url, "refusing image from host outside allow-list");
            return Err(AniranError::ForbiddenHost);
        }
        Ok(url)
    }

    /// Fetch an allow-listed image.
    ///
    /// Non-success upstream statuses are returned as a [`ProxiedImage`]
    /// rather than an error so the caller can relay them.
    pub async fn fetch(&self, raw_url: &str) -> Result<ProxiedImage> {
        let url = self.check(raw_url)?;
        debug!(%url, "proxying image");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL,
            "service" => "image",
            "status" => if status.is_success() { "ok" } else { "error" },
        )
        .increment(1);

        Ok(ProxiedImage {
            status: status.as_u16(),
            content_type,
            bytes,
        })
    }
}

impl Default for ImageProxy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hosts_allowed() {
        let proxy = ImageProxy::new();
        assert!(
            proxy
                .check("https://cdn.myanimelist.net/images/anime/13/17405.jpg")
                .is_ok()
        );
        assert!(proxy.check("https://img.youtube.com/vi/x/0.jpg").is_ok());
    }

    #[test]
    fn other_hosts_forbidden() {
        let proxy = ImageProxy::new();
        assert!(matches!(
            proxy.check("https://evil.example.com/a.jpg"),
            Err(AniranError::ForbiddenHost)
        ));
        // Suffix tricks do not match
        assert!(matches!(
            proxy.check("https://cdn.myanimelist.net.evil.com/a.jpg"),
            Err(AniranError::ForbiddenHost)
        ));
    }

    #[test]
    fn missing_or_invalid_url_is_bad_request() {
        let proxy = ImageProxy::new();
        assert_eq!(proxy.check("").unwrap_err().status_code(), 400);
        assert_eq!(proxy.check("not a url").unwrap_err().status_code(), 400);
    }
}
