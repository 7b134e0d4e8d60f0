//! Anime detail enrichment.
//!
//! [`AnimeDetailsService`] serves one anime record with Persian title and
//! synopsis attached:
//!
//! 1. Current cache key (`anime:v4:<id>`), returned as-is on a hit.
//! 2. Legacy keys (v3, v2, unversioned) in order. The first entry carrying a
//!    valid translation is copied to the current key and returned. Invalid
//!    entries are skipped, never deleted.
//! 3. Fresh fetch from the metadata provider, then the two-attempt
//!    translation [`policy`].
//!
//! Steps 1 and 2 are skipped on force-refresh. A fresh record is written to
//! the current key only when its translation was accepted, so the cache never
//! holds untranslated fallbacks.

pub mod policy;
pub mod validity;

pub use policy::{AcceptedTranslation, AttemptKind, AttemptOutcome, TranslationState};
pub use validity::{is_valid_for, is_valid_record, is_valid_translation};

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{CacheClient, current_key, legacy_keys};
use crate::providers::{MetadataProvider, TranslationProvider};
use crate::telemetry;
use crate::types::{
    AnimeRecord, DetailsResponse, EnrichedRecord, Source, TranslationErrorKind,
};
use crate::{AniranError, Result};

/// Orchestrates cache lookup, metadata fetch and translation for one anime.
#[derive(Clone)]
pub struct AnimeDetailsService {
    cache: CacheClient,
    metadata: Arc<dyn MetadataProvider>,
    translator: Arc<dyn TranslationProvider>,
}

impl AnimeDetailsService {
    /// Create a service from its collaborators.
    pub fn new(
        cache: CacheClient,
        metadata: Arc<dyn MetadataProvider>,
        translator: Arc<dyn TranslationProvider>,
    ) -> Self {
        Self {
            cache,
            metadata,
            translator,
        }
    }

    /// Serve the enriched record for `id`.
    ///
    /// Fails only on an empty `id` (`BadRequest`) or a metadata fetch error;
    /// translation problems are reported in
    /// [`DetailsResponse::translation_error`].
    pub async fn details(&self, id: &str, force_refresh: bool) -> Result<DetailsResponse> {
        if id.trim().is_empty() {
            return Err(AniranError::BadRequest("No anime ID provided".into()));
        }
        info!(id, force_refresh, "anime details requested");

        if force_refresh {
            info!(id, "force refresh, skipping cache");
        } else if let Some(cached) = self.lookup_cached(id).await {
            return Ok(cached);
        }

        self.fetch_fresh(id).await
    }

    /// Probe the current key, then the legacy keys in order.
    async fn lookup_cached(&self, id: &str) -> Option<DetailsResponse> {
        let key = current_key(id);
        if let Some(record) = self.cache.get::<EnrichedRecord>(&key).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "tier" => "current").increment(1);
            info!(key = %key, "cache hit");
            return Some(DetailsResponse::cached(record, Source::Cache));
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "tier" => "current").increment(1);

        for legacy_key in legacy_keys(id) {
            let Some(record) = self.cache.get::<EnrichedRecord>(&legacy_key).await else {
                continue;
            };
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "tier" => "legacy").increment(1);

            if !is_valid_record(&record) {
                info!(key = %legacy_key, "legacy entry is untranslated, checking next key");
                continue;
            }

            info!(from = %legacy_key, to = %key, "migrating legacy cache entry");
            self.cache.set(&key, &record).await;
            metrics::counter!(telemetry::CACHE_MIGRATIONS_TOTAL).increment(1);
            return Some(DetailsResponse::cached(record, Source::CacheMigrated));
        }

        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "tier" => "legacy").increment(1);
        None
    }

    /// Fetch, translate, assemble and conditionally cache.
    async fn fetch_fresh(&self, id: &str) -> Result<DetailsResponse> {
        let record = self.metadata.fetch_anime(id).await?;
        let translation = self.translate(id, &record).await;

        let source_title = record.source_title().to_string();
        let source_synopsis = record.source_synopsis().to_string();

        let response = match translation {
            Ok(accepted) => {
                let synopsis = accepted
                    .persian_synopsis
                    .filter(|s| !s.is_empty())
                    .unwrap_or(source_synopsis);
                let enriched = EnrichedRecord::new(record, accepted.persian_title, synopsis);
                self.cache.set(&current_key(id), &enriched).await;
                info!(id, "cached translated record");
                DetailsResponse {
                    data: enriched,
                    source: Source::ApiFresh,
                    translation_error: None,
                }
            }
            Err(kind) => {
                warn!(id, error = ?kind, "translation failed, not caching");
                DetailsResponse {
                    data: EnrichedRecord::new(record, source_title, source_synopsis),
                    source: Source::ApiUntranslated,
                    translation_error: Some(kind),
                }
            }
        };

        Ok(response)
    }

    /// Run the translation policy to a terminal state.
    async fn translate(
        &self,
        id: &str,
        record: &AnimeRecord,
    ) -> std::result::Result<AcceptedTranslation, TranslationErrorKind> {
        let title = record.source_title();
        let synopsis = record.source_synopsis();
        let mut state = TranslationState::Pending;

        while let Some(attempt) = state.pending_attempt() {
            let result = match attempt {
                AttemptKind::Full => self.translator.translate(title, Some(synopsis)).await,
                AttemptKind::TitleOnly => self.translator.translate(title, None).await,
            };
            let outcome = AttemptOutcome::classify(&result, record);

            metrics::counter!(telemetry::TRANSLATION_ATTEMPTS_TOTAL,
                "attempt" => attempt.as_str(),
                "outcome" => outcome.as_str(),
            )
            .increment(1);
            match &result {
                Ok(_) => info!(
                    id,
                    provider = self.translator.name(),
                    attempt = attempt.as_str(),
                    outcome = outcome.as_str(),
                    "translation attempt finished"
                ),
                Err(e) => warn!(
                    id,
                    provider = self.translator.name(),
                    attempt = attempt.as_str(),
                    error = %e,
                    "translation attempt failed"
                ),
            }

            state = state.next(outcome);
        }

        match state {
            TranslationState::Succeeded(accepted) => Ok(accepted),
            TranslationState::Failed(kind) => Err(kind),
            // pending_attempt() is None only for the two terminal states
            _ => Err(TranslationErrorKind::GeneralFailure),
        }
    }
}
