//! Aniran error types

/// Aniran error types
#[derive(Debug, thiserror::Error)]
pub enum AniranError {
    // Request validation errors
    #[error("{0}")]
    BadRequest(String),

    #[error("Forbidden host")]
    ForbiddenHost,

    // Upstream/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    // Translation errors
    #[error("rate limited: resource exhausted")]
    RateLimited,

    #[error("content blocked: {reason}")]
    ContentBlocked { reason: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Never escapes [`CacheClient`](crate::cache::CacheClient); backends
    /// return it and the client degrades to a miss or no-op.
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Block reason the generative API reports when the synopsis itself was refused.
pub const PROHIBITED_CONTENT: &str = "PROHIBITED_CONTENT";

impl AniranError {
    /// HTTP status this error maps to when it reaches a caller.
    ///
    /// Upstream failures pass the remote status through unchanged.
    pub fn status_code(&self) -> u16 {
        match self {
            AniranError::BadRequest(_) => 400,
            AniranError::ForbiddenHost => 403,
            AniranError::Upstream { status, .. } => *status,
            AniranError::RateLimited => 429,
            AniranError::ContentBlocked { .. } => 422,
            AniranError::MalformedResponse(_) | AniranError::Http(_) => 502,
            AniranError::CacheUnavailable(_) => 503,
            AniranError::Json(_) | AniranError::Configuration(_) => 500,
        }
    }

    /// Whether this is a content block caused by prohibited content, which
    /// a title-only retry may get past.
    pub fn is_prohibited_content(&self) -> bool {
        matches!(self, AniranError::ContentBlocked { reason } if reason == PROHIBITED_CONTENT)
    }
}

impl From<reqwest::Error> for AniranError {
    /// Drops the request URL so credentials carried in it never reach a
    /// log line or response body.
    fn from(err: reqwest::Error) -> Self {
        AniranError::Http(err.without_url().to_string())
    }
}

/// Result type alias for Aniran operations
pub type Result<T> = std::result::Result<T, AniranError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_passes_through() {
        let err = AniranError::Upstream {
            status: 404,
            message: "Not Found".into(),
        };
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "upstream error (404): Not Found");
    }

    #[test]
    fn local_validation_statuses() {
        assert_eq!(AniranError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(AniranError::ForbiddenHost.status_code(), 403);
        assert_eq!(AniranError::Configuration("x".into()).status_code(), 500);
    }

    #[test]
    fn prohibited_content_detection() {
        let blocked = AniranError::ContentBlocked {
            reason: PROHIBITED_CONTENT.into(),
        };
        assert!(blocked.is_prohibited_content());

        let other = AniranError::ContentBlocked {
            reason: "SAFETY".into(),
        };
        assert!(!other.is_prohibited_content());
        assert!(!AniranError::RateLimited.is_prohibited_content());
    }
}
