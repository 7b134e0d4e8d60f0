//! Translation payloads and the provenance tags reported to callers.

use serde::{Deserialize, Serialize};

use super::EnrichedRecord;

/// Persian translation returned by the generative API.
///
/// Title-only requests leave `persian_synopsis` empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationCandidate {
    #[serde(default)]
    pub persian_title: Option<String>,
    #[serde(default)]
    pub persian_synopsis: Option<String>,
}

impl TranslationCandidate {
    /// Candidate with only a title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            persian_title: Some(title.into()),
            persian_synopsis: None,
        }
    }

    /// Candidate with both title and synopsis.
    pub fn full(title: impl Into<String>, synopsis: impl Into<String>) -> Self {
        Self {
            persian_title: Some(title.into()),
            persian_synopsis: Some(synopsis.into()),
        }
    }
}

/// Where the returned record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    /// Current-version cache key.
    #[serde(rename = "cache")]
    Cache,
    /// Legacy cache key, copied forward to the current key.
    #[serde(rename = "cache-migrated")]
    CacheMigrated,
    /// Freshly fetched and translated.
    #[serde(rename = "api-fresh")]
    ApiFresh,
    /// Freshly fetched; translation failed, originals used.
    #[serde(rename = "api-untranslated")]
    ApiUntranslated,
}

/// Why translation was abandoned, reported as an advisory to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationErrorKind {
    RateLimit,
    GeneralFailure,
}

/// Response body of the anime details endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailsResponse {
    pub data: EnrichedRecord,
    pub source: Source,
    #[serde(
        rename = "translationError",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub translation_error: Option<TranslationErrorKind>,
}

impl DetailsResponse {
    /// Response for a record served from cache.
    pub fn cached(data: EnrichedRecord, source: Source) -> Self {
        Self {
            data,
            source,
            translation_error: None,
        }
    }
}
