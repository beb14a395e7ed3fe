use std::str::FromStr;

use anyhow::{Context, Result};

use crate::llm_client;

const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Application configuration loaded from environment variables.
///
/// Only the listening port and tuning knobs have defaults. Backing services
/// (Postgres, S3, the text-generation API) are optional: when unset the API
/// falls back to in-process storage, local disk uploads, and an unconfigured
/// distribution generator.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub seed_candidates: usize,
    pub seed_rng: u64,
    pub s3_bucket: Option<String>,
    pub s3_endpoint: Option<String>,
    pub upload_dir: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: String,
    pub geocoder_url: String,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
    pub upstream_timeout_secs: u64,
    pub cors_origin: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            seed_candidates: parse_env("SEED_CANDIDATES", 500)?,
            seed_rng: parse_env("SEED_RNG", 42)?,
            s3_bucket: optional_env("S3_BUCKET"),
            s3_endpoint: optional_env("S3_ENDPOINT"),
            upload_dir: optional_env("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            anthropic_base_url: optional_env("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| llm_client::DEFAULT_BASE_URL.to_string()),
            geocoder_url: optional_env("GEOCODER_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            cache_capacity: parse_env("CACHE_CAPACITY", 256)?,
            cache_ttl_secs: parse_env("CACHE_TTL_SECS", 86_400)?,
            upstream_timeout_secs: parse_env("UPSTREAM_TIMEOUT_SECS", 30)?,
            cors_origin: optional_env("CORS_ORIGIN"),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Returns the variable's value, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
