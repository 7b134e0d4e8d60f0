//! Caching subsystem.
//!
//! Enriched records are stored as opaque JSON strings in an external
//! key-value store. Two backends implement [`CacheStore`]:
//!
//! - [`UpstashStore`] — Redis over the Upstash REST API, bearer-token auth.
//! - [`MemoryStore`] — in-process moka cache, for development and tests.
//!
//! Callers never talk to a store directly. [`CacheClient`] wraps an optional
//! store and absorbs every failure: an unconfigured store is a no-op, and a
//! transport error on read is indistinguishable from a miss.

pub mod keys;
pub mod memory;
pub mod upstash;

pub use keys::{LEGACY_KEY_PREFIXES, current_key, legacy_keys};
pub use memory::MemoryStore;
pub use upstash::UpstashStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::Result;
use crate::telemetry;

/// A string-keyed store of string values with no expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Read a value. `Ok(None)` is a true miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value permanently, overwriting any previous one.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

/// Failure-tolerant front for an optional [`CacheStore`].
#[derive(Clone, Default)]
pub struct CacheClient {
    store: Option<Arc<dyn CacheStore>>,
}

impl CacheClient {
    /// Client backed by the given store.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Client with no store; every read misses and every write is dropped.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Whether a backing store is configured.
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Read and decode a value.
    ///
    /// Returns `None` on a miss, on any backend failure, and when the stored
    /// payload does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let Some(store) = &self.store else {
            debug!(key, "cache not configured, skipping read");
            return None;
        };

        let raw = match store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "operation" => "get").increment(1);
                warn!(backend = store.name(), key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "operation" => "get").increment(1);
                warn!(backend = store.name(), key, error = %e, "undecodable cache entry, treating as miss");
                None
            }
        }
    }

    /// Encode and write a value. Failures are logged and dropped.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        let Some(store) = &self.store else {
            debug!(key, "cache not configured, skipping write");
            return;
        };

        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "failed to encode cache entry");
                return;
            }
        };

        if let Err(e) = store.set(key, raw).await {
            metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "operation" => "set").increment(1);
            warn!(backend = store.name(), key, error = %e, "cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AniranError;

    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(AniranError::CacheUnavailable("connection refused".into()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<()> {
            Err(AniranError::CacheUnavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn disabled_client_misses_and_drops_writes() {
        let client = CacheClient::disabled();
        assert!(!client.is_enabled());
        client.set("k", &"v").await;
        assert_eq!(client.get::<String>("k").await, None);
    }

    #[tokio::test]
    async fn backend_failure_reads_as_miss() {
        let client = CacheClient::new(Arc::new(BrokenStore));
        client.set("k", &"v").await;
        assert_eq!(client.get::<String>("k").await, None);
    }

    #[tokio::test]
    async fn undecodable_entry_reads_as_miss() {
        let store = Arc::new(MemoryStore::new());
        store.set("k", "not json".into()).await.unwrap();
        let client = CacheClient::new(store);
        assert_eq!(client.get::<serde_json::Value>("k").await, None);
    }

    #[tokio::test]
    async fn values_are_stored_as_json() {
        let store = Arc::new(MemoryStore::new());
        let client = CacheClient::new(store.clone());
        client.set("k", &serde_json::json!({"a": 1})).await;

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some(r#"{"a":1}"#));
        let back: serde_json::Value = client.get("k").await.unwrap();
        assert_eq!(back["a"], 1);
    }
}
