use dotenvy::dotenv;
use std::env;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub bind_addr: String,
    /// Base URL of an HTTP capture service, if screenshots go through one.
    pub render_service_url: Option<String>,
    pub extra_blocked_domains: Vec<String>,
}

impl Config {
    /// Reads the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv().ok();
        Ok(Config {
            api_key: get_env("API_KEY")?,
            bind_addr: get_env_or_default("BIND_ADDR", DEFAULT_BIND_ADDR),
            render_service_url: get_optional_env("RENDER_SERVICE_URL"),
            extra_blocked_domains: get_optional_env("EXTRA_BLOCKED_DOMAINS")
                .map(|list| split_list(&list))
                .unwrap_or_default(),
        })
    }
}

fn get_env(key: &'static str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or(ConfigError::Missing(key))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Unset and blank are treated the same.
fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
