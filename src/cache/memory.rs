//! In-process cache backend.
//!
//! Bounded by entry count only; entries never expire. Not shared between
//! processes, so it stands in for the external store in development and tests.

use async_trait::async_trait;
use moka::future::Cache;

use super::CacheStore;
use crate::Result;

/// Default maximum number of entries.
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Moka-backed [`CacheStore`].
pub struct MemoryStore {
    entries: Cache<String, String>,
}

impl MemoryStore {
    /// Create an empty store with the default capacity (10,000).
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create a store with a custom capacity.
    pub fn with_max_entries(max: u64) -> Self {
        Self {
            entries: Cache::new(max),
        }
    }

    /// Whether `key` currently holds a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value).await;
        Ok(())
    }
}
