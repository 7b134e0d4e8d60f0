//! Translation validity heuristic.
//!
//! The generative API sometimes echoes the source title back instead of
//! translating it. A Persian title identical to an existing title is treated
//! as no translation at all.

use crate::types::{AnimeRecord, EnrichedRecord, non_empty};

/// Whether `persian_title` is a usable translation of a record titled
/// `title` / `title_english`.
///
/// Rejects a missing or empty candidate, and one equal (byte for byte) to
/// either title. An empty English title counts as absent.
pub fn is_valid_translation(
    persian_title: Option<&str>,
    title: Option<&str>,
    title_english: Option<&str>,
) -> bool {
    let Some(candidate) = non_empty(persian_title) else {
        return false;
    };
    if title == Some(candidate) {
        return false;
    }
    non_empty(title_english) != Some(candidate)
}

/// [`is_valid_translation`] against a record's own title fields.
pub fn is_valid_for(persian_title: Option<&str>, record: &AnimeRecord) -> bool {
    is_valid_translation(
        persian_title,
        record.title.as_deref(),
        record.title_english.as_deref(),
    )
}

/// Whether a stored record carries a valid translation of itself.
pub fn is_valid_record(record: &EnrichedRecord) -> bool {
    is_valid_for(record.persian_title.as_deref(), &record.record)
}
