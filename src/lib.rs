//! Aniran - anime metadata gateway with Persian translation enrichment
//!
//! This crate fronts three third-party services for the Aniran frontend:
//! the Jikan metadata API, the Gemini generative-language API, and the
//! image CDNs behind them. Most endpoints are thin passthroughs; the anime
//! details endpoint enriches a Jikan record with a Persian title and
//! synopsis and caches the result in a key-value store.
//!
//! # Enrichment Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use aniran::cache::{CacheClient, UpstashStore};
//! use aniran::enrich::AnimeDetailsService;
//! use aniran::providers::{GeminiClient, JikanClient};
//!
//! #[tokio::main]
//! async fn main() -> aniran::Result<()> {
//!     let cache = CacheClient::new(Arc::new(UpstashStore::new(
//!         "https://eu1-example.upstash.io",
//!         "upstash-token",
//!     )));
//!     let service = AnimeDetailsService::new(
//!         cache,
//!         Arc::new(JikanClient::new()),
//!         Arc::new(GeminiClient::new("gemini-api-key")),
//!     );
//!
//!     let response = service.details("20", false).await?;
//!     println!("{:?}: {:?}", response.source, response.data.persian_title);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod enrich;
pub mod error;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export main types at crate root
pub use enrich::AnimeDetailsService;
pub use error::{AniranError, Result};

// Re-export all types
pub use types::{
    AnimeRecord, DetailsResponse, EnrichedRecord, Source, TranslationCandidate,
    TranslationErrorKind,
};
