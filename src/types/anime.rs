//! Anime record types: the upstream entity and its enriched form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder synopsis used when the upstream record has none.
pub const NO_SYNOPSIS: &str = "No synopsis available.";

/// One anime entity as returned by the metadata API.
///
/// Only the title and synopsis fields are interpreted; every other field is
/// carried in `extra` and serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnimeRecord {
    /// Create a record with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set the English title.
    pub fn title_english(mut self, title: impl Into<String>) -> Self {
        self.title_english = Some(title.into());
        self
    }

    /// Set the synopsis.
    pub fn synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = Some(synopsis.into());
        self
    }

    /// Title to translate from: the English title when present, else the
    /// original title. Empty strings count as absent.
    pub fn source_title(&self) -> &str {
        non_empty(self.title_english.as_deref())
            .or_else(|| non_empty(self.title.as_deref()))
            .unwrap_or_default()
    }

    /// Synopsis to translate from, or [`NO_SYNOPSIS`].
    pub fn source_synopsis(&self) -> &str {
        non_empty(self.synopsis.as_deref()).unwrap_or(NO_SYNOPSIS)
    }
}

/// An [`AnimeRecord`] with Persian title and synopsis attached.
///
/// The only shape ever written to the cache or returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: AnimeRecord,
    #[serde(default)]
    pub persian_title: Option<String>,
    #[serde(default)]
    pub persian_synopsis: Option<String>,
}

impl EnrichedRecord {
    /// Attach translated fields to a record.
    pub fn new(
        record: AnimeRecord,
        persian_title: impl Into<String>,
        persian_synopsis: impl Into<String>,
    ) -> Self {
        Self {
            record,
            persian_title: Some(persian_title.into()),
            persian_synopsis: Some(persian_synopsis.into()),
        }
    }
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
