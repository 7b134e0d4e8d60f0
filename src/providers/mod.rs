//! Upstream service clients.
//!
//! - [`JikanClient`] — anime metadata ([`MetadataProvider`])
//! - [`GeminiClient`] — Persian translation ([`TranslationProvider`])
//! - [`ImageProxy`] — allow-listed image fetches
//!
//! Besides their typed operations, the Jikan and Gemini clients expose raw
//! passthrough methods returning [`ProxiedJson`], which relays the upstream
//! status and body unchanged.

pub mod gemini;
pub mod image;
pub mod jikan;
pub mod traits;

pub use gemini::GeminiClient;
pub use image::{ImageProxy, ProxiedImage};
pub use jikan::JikanClient;
pub use traits::{MetadataProvider, TranslationProvider};

use serde_json::Value;

use crate::Result;

/// An upstream JSON response relayed as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxiedJson {
    /// Upstream HTTP status.
    pub status: u16,
    /// Upstream body, success or error.
    pub body: Value,
}

impl ProxiedJson {
    /// Capture status and JSON body from a response.
    ///
    /// A body that is not JSON is an error regardless of status.
    pub(crate) async fn from_response(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;
        Ok(Self { status, body })
    }

    /// Whether the upstream reported success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// Understands Google-style `{"error": {"message": ..}}` and Jikan-style
/// `{"message": ..}` / `{"error": ".."}` bodies.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .or_else(|| body.get("message"))
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
