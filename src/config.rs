use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use reqwest::Url;

pub const DEFAULT_RECIPE_API_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

#[derive(Debug, Clone)]
pub struct RecipeApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub recipe_api: RecipeApiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into());
        let bind_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid bind address {host}:{port}"))?;

        let data_dir = std::env::var("CULINARY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".culinary"));

        let raw_base = std::env::var("RECIPE_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_RECIPE_API_BASE_URL.into());
        let base_url = parse_base_url(&raw_base)?;

        let timeout_secs = match std::env::var("RECIPE_API_TIMEOUT_SECS") {
            Ok(v) => v
                .parse::<u64>()
                .with_context(|| format!("RECIPE_API_TIMEOUT_SECS must be an integer, got {v:?}"))?,
            Err(_) => 10,
        };

        Ok(Self {
            bind_addr,
            data_dir,
            recipe_api: RecipeApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

/// Parses the recipe API root, forcing a trailing slash so that `Url::join`
/// appends endpoint names instead of replacing the last path segment.
pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).with_context(|| format!("invalid RECIPE_API_BASE_URL {raw:?}"))
}
