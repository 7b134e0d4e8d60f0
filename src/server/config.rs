//! Configuration loading for the aniran server.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.aniran/config.toml` (user)
//! 3. `/etc/aniran/config.toml` (system)
//!
//! With no file at all, defaults are used so the server can run from
//! environment variables alone.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.aniran/secrets.toml` (user, must be 0600)
//! 2. `/etc/aniran/secrets.toml` (system, must be 0600)
//!
//! Each secret falls back to its environment variable.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::providers::{gemini, image, jikan};
use crate::{AniranError, Result};

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable holding the Upstash REST URL.
pub const UPSTASH_URL_ENV: &str = "UPSTASH_REDIS_REST_URL";
/// Environment variable holding the Upstash REST token.
pub const UPSTASH_TOKEN_ENV: &str = "UPSTASH_REDIS_REST_TOKEN";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub jikan: JikanConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub images: ImagesConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8888).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8888".to_string()
}

/// Metadata API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JikanConfig {
    #[serde(default = "default_jikan_url")]
    pub base_url: String,
}

impl Default for JikanConfig {
    fn default() -> Self {
        Self {
            base_url: default_jikan_url(),
        }
    }
}

fn default_jikan_url() -> String {
    jikan::DEFAULT_BASE_URL.to_string()
}

/// Generative API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_url(),
            model: default_gemini_model(),
        }
    }
}

fn default_gemini_url() -> String {
    gemini::DEFAULT_BASE_URL.to_string()
}

fn default_gemini_model() -> String {
    gemini::DEFAULT_MODEL.to_string()
}

/// Which cache backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Upstash REST; degrades to no caching without URL and token.
    #[default]
    Upstash,
    /// In-process store, lost on restart.
    Memory,
    /// No caching.
    None,
}

/// Cache configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    /// Upstash REST URL; falls back to `UPSTASH_REDIS_REST_URL`.
    #[serde(default)]
    pub url: Option<String>,
}

impl CacheConfig {
    /// Configured URL, or the environment variable.
    pub fn url(&self) -> Option<String> {
        self.url_with(|name| std::env::var(name).ok())
    }

    fn url_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.url.clone().or_else(|| env(UPSTASH_URL_ENV))
    }
}

/// Image proxy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: default_allowed_hosts(),
        }
    }
}

fn default_allowed_hosts() -> Vec<String> {
    image::DEFAULT_ALLOWED_HOSTS
        .iter()
        .map(|h| h.to_string())
        .collect()
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub gemini: Option<ApiKeySecret>,
    #[serde(default)]
    pub upstash: Option<TokenSecret>,
}

/// An API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// A bearer token secret.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSecret {
    pub token: String,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first of
    /// `~/.aniran/config.toml` and `/etc/aniran/config.toml` that exists is
    /// used, else defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            AniranError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            AniranError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(AniranError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".aniran").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/aniran/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (environment variables are
    /// consulted per secret).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".aniran").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/aniran/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load secrets from a specific file, with the same permission check.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        Self::load_from_file(path)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AniranError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            AniranError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            AniranError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(AniranError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Gemini API key, falling back to `GEMINI_API_KEY`.
    pub fn gemini_api_key(&self) -> Option<String> {
        self.gemini_api_key_with(|name| std::env::var(name).ok())
    }

    /// Upstash token, falling back to `UPSTASH_REDIS_REST_TOKEN`.
    pub fn upstash_token(&self) -> Option<String> {
        self.upstash_token_with(|name| std::env::var(name).ok())
    }

    fn gemini_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.gemini
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| env(GEMINI_API_KEY_ENV))
    }

    fn upstash_token_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.upstash
            .as_ref()
            .map(|s| s.token.clone())
            .or_else(|| env(UPSTASH_TOKEN_ENV))
    }
}
