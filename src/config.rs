// src/config.rs
//! Service settings: environment variables (with `.env` support) over an
//! optional TOML overlay. Env always wins; the file fills gaps; compiled
//! defaults come last.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const ENV_CONFIG_PATH: &str = "CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/settings.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    /// API key for the media catalog; the only setting with no default.
    pub catalog_api_key: String,
    pub catalog_api_base: String,
    pub catalog_image_base: String,
    pub default_language: String,
    pub listing_base_url: String,
    pub listing_timeout_secs: u64,
    /// Default result-count cap when the request does not pass one.
    pub max_results_default: usize,
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            catalog_api_key: String::new(),
            catalog_api_base: "https://api.themoviedb.org/3".to_string(),
            catalog_image_base: "https://image.tmdb.org/t/p/".to_string(),
            default_language: "zh-CN".to_string(),
            listing_base_url: "https://b.funletu.com".to_string(),
            listing_timeout_secs: 10,
            max_results_default: 20,
            cache_enabled: true,
            cache_ttl_secs: 3600,
        }
    }
}

/// Optional TOML overlay — every field optional so a file can set just one.
#[derive(Debug, Default, Deserialize)]
struct FileOverlay {
    bind_addr: Option<String>,
    catalog_api_key: Option<String>,
    catalog_api_base: Option<String>,
    catalog_image_base: Option<String>,
    default_language: Option<String>,
    listing_base_url: Option<String>,
    listing_timeout_secs: Option<u64>,
    max_results_default: Option<usize>,
    cache_enabled: Option<bool>,
    cache_ttl_secs: Option<u64>,
}

fn env_str(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_str(name).and_then(|v| v.trim().parse().ok())
}

fn env_bool(name: &str) -> Option<bool> {
    env_str(name).map(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
}

impl Settings {
    /// Resolve settings from `$CONFIG_PATH` / `config/settings.toml` (if
    /// present) and the environment. Fails only when the catalog API key is
    /// missing everywhere.
    pub fn from_env() -> Result<Self> {
        let overlay = match resolve_config_path() {
            Some(path) => load_overlay(&path)?,
            None => FileOverlay::default(),
        };
        Self::from_parts(overlay)
    }

    fn from_parts(overlay: FileOverlay) -> Result<Self> {
        let defaults = Self::default();
        let settings = Self {
            bind_addr: env_str("BIND_ADDR")
                .or(overlay.bind_addr)
                .unwrap_or(defaults.bind_addr),
            catalog_api_key: env_str("CATALOG_API_KEY")
                .or(overlay.catalog_api_key)
                .unwrap_or(defaults.catalog_api_key),
            catalog_api_base: env_str("CATALOG_API_BASE")
                .or(overlay.catalog_api_base)
                .unwrap_or(defaults.catalog_api_base),
            catalog_image_base: env_str("CATALOG_IMAGE_BASE")
                .or(overlay.catalog_image_base)
                .unwrap_or(defaults.catalog_image_base),
            default_language: env_str("DEFAULT_LANG")
                .or(overlay.default_language)
                .unwrap_or(defaults.default_language),
            listing_base_url: env_str("LISTING_BASE_URL")
                .or(overlay.listing_base_url)
                .unwrap_or(defaults.listing_base_url),
            listing_timeout_secs: env_parse("LISTING_TIMEOUT_SECS")
                .or(overlay.listing_timeout_secs)
                .unwrap_or(defaults.listing_timeout_secs),
            max_results_default: env_parse("SEARCH_MAX_RESULTS")
                .or(overlay.max_results_default)
                .unwrap_or(defaults.max_results_default),
            cache_enabled: env_bool("CACHE_ENABLED")
                .or(overlay.cache_enabled)
                .unwrap_or(defaults.cache_enabled),
            cache_ttl_secs: env_parse("CACHE_TTL_SECS")
                .or(overlay.cache_ttl_secs)
                .unwrap_or(defaults.cache_ttl_secs),
        };
        if settings.catalog_api_key.is_empty() {
            bail!("CATALOG_API_KEY is not set (env or {DEFAULT_CONFIG_PATH})");
        }
        Ok(settings)
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env_str(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(p));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    default.exists().then_some(default)
}

fn load_overlay(path: &Path) -> Result<FileOverlay> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
