//! Public types for the Aniran API.

mod anime;
mod translation;

pub use anime::{AnimeRecord, EnrichedRecord, NO_SYNOPSIS};
pub(crate) use anime::non_empty;
pub use translation::{DetailsResponse, Source, TranslationCandidate, TranslationErrorKind};
