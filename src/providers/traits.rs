//! Provider traits for the upstream services the enrichment flow depends on.
//!
//! The orchestrator holds these as trait objects so tests can substitute
//! in-memory fakes for the HTTP clients.

use async_trait::async_trait;

use crate::Result;
use crate::types::{AnimeRecord, TranslationCandidate};

// ============================================================================
// Metadata Provider
// ============================================================================

/// Source of anime metadata records.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch the full record for one anime.
    ///
    /// Non-success upstream responses surface as
    /// [`AniranError::Upstream`](crate::AniranError::Upstream).
    async fn fetch_anime(&self, id: &str) -> Result<AnimeRecord>;
}

// ============================================================================
// Translation Provider
// ============================================================================

/// Translator of anime titles and synopses into Persian.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Translate a title, and the synopsis when one is given.
    ///
    /// Passing `None` for `synopsis` requests a title-only translation.
    /// Failures are classified as `RateLimited`, `ContentBlocked`,
    /// `MalformedResponse` or `Upstream`.
    async fn translate(&self, title: &str, synopsis: Option<&str>)
    -> Result<TranslationCandidate>;
}
