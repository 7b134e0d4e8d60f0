//! HTTP server.
//!
//! This module provides:
//! - Configuration types (`config`)
//! - Request handlers and error-to-response mapping (`handlers`)
//! - [`AppState`] assembly and the axum [`Router`]
//!
//! | Route                     | Handler                         |
//! |---------------------------|---------------------------------|
//! | `GET /get-anime-details`  | enriched anime record           |
//! | `GET /image-proxy`        | allow-listed image passthrough  |
//! | `GET /jikan-proxy`        | metadata API passthrough        |
//! | `POST /gemini-proxy`      | generative API passthrough      |
//! | `GET /health`             | liveness                        |

pub mod config;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::{info, warn};

use crate::cache::{CacheClient, MemoryStore, UpstashStore};
use crate::enrich::AnimeDetailsService;
use crate::providers::{GeminiClient, ImageProxy, JikanClient};

use config::{CacheBackend, Config, Secrets};

/// Shared handler state. Cheap to clone; all clients are stateless.
#[derive(Clone)]
pub struct AppState {
    pub details: AnimeDetailsService,
    pub jikan: JikanClient,
    pub gemini: GeminiClient,
    pub images: ImageProxy,
}

impl AppState {
    /// Build every client from configuration.
    ///
    /// Missing Upstash credentials disable caching rather than failing;
    /// a missing Gemini key leaves translation and the Gemini passthrough
    /// failing per request.
    pub fn from_config(config: &Config, secrets: &Secrets) -> Self {
        let cache = build_cache(config, secrets);

        let gemini_key = secrets.gemini_api_key();
        if gemini_key.is_none() {
            warn!("no Gemini API key configured, translations will fail");
        }
        let gemini = GeminiClient::with_base_url(gemini_key, &config.gemini.base_url)
            .model(&config.gemini.model);
        let jikan = JikanClient::with_base_url(&config.jikan.base_url);
        let images = ImageProxy::with_allowed_hosts(config.images.allowed_hosts.iter().cloned());

        Self::new(cache, jikan, gemini, images)
    }

    /// Assemble state from ready-made clients.
    pub fn new(
        cache: CacheClient,
        jikan: JikanClient,
        gemini: GeminiClient,
        images: ImageProxy,
    ) -> Self {
        let details = AnimeDetailsService::new(
            cache,
            Arc::new(jikan.clone()),
            Arc::new(gemini.clone()),
        );
        Self {
            details,
            jikan,
            gemini,
            images,
        }
    }
}

fn build_cache(config: &Config, secrets: &Secrets) -> CacheClient {
    match config.cache.backend {
        CacheBackend::Upstash => match (config.cache.url(), secrets.upstash_token()) {
            (Some(url), Some(token)) => {
                info!(%url, "using Upstash cache");
                CacheClient::new(Arc::new(UpstashStore::new(url, token)))
            }
            _ => {
                warn!("Upstash URL or token not set, caching disabled");
                CacheClient::disabled()
            }
        },
        CacheBackend::Memory => {
            info!("using in-memory cache");
            CacheClient::new(Arc::new(MemoryStore::new()))
        }
        CacheBackend::None => {
            info!("caching disabled by configuration");
            CacheClient::disabled()
        }
    }
}

/// Build the router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/get-anime-details", get(handlers::anime_details))
        .route("/image-proxy", get(handlers::image_proxy))
        .route("/jikan-proxy", get(handlers::jikan_proxy))
        .route("/gemini-proxy", post(handlers::gemini_proxy))
        .route("/health", get(handlers::health))
        .with_state(state)
}
