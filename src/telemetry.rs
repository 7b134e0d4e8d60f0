//! Telemetry metric name constants.
//!
//! Centralised metric names for aniran operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `aniran_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `tier` — cache tier consulted: "current" or "legacy"
//! - `attempt` — translation attempt: "full" or "title_only"
//! - `outcome` — attempt result: "accepted", "rejected", "rate_limit", "blocked", "error"
//! - `service` — upstream service: "jikan", "gemini", "image"

/// Total cache hits.
///
/// Labels: `tier`.
pub const CACHE_HITS_TOTAL: &str = "aniran_cache_hits_total";

/// Total cache misses.
///
/// Labels: `tier`.
pub const CACHE_MISSES_TOTAL: &str = "aniran_cache_misses_total";

/// Cache operations that failed and were absorbed as a miss or no-op.
///
/// Labels: `operation` ("get" | "set").
pub const CACHE_ERRORS_TOTAL: &str = "aniran_cache_errors_total";

/// Legacy entries copied forward to the current key.
pub const CACHE_MIGRATIONS_TOTAL: &str = "aniran_cache_migrations_total";

/// Translation attempts made against the generative API.
///
/// Labels: `attempt`, `outcome`.
pub const TRANSLATION_ATTEMPTS_TOTAL: &str = "aniran_translation_attempts_total";

/// Requests sent to upstream services.
///
/// Labels: `service`, `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "aniran_upstream_requests_total";
