use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const APP_NAME: &str = "Stockholm Sauna Directory";
pub const APP_DESCRIPTION: &str = "The most comprehensive directory of saunas in Stockholm";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Hosted database
    pub store_url: String,
    pub store_key: String,

    // Web server
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,

    // Public site
    pub app_url: String,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = parse_number(&or_default("API_PORT", "3000"), "API_PORT")?;
        let timeout_secs: u64 = parse_number(&or_default("REQUEST_TIMEOUT_SECS", "10"), "REQUEST_TIMEOUT_SECS")?;

        Ok(Self {
            store_url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
            store_key: required("SUPABASE_ANON_KEY")?,
            host: or_default("API_HOST", "0.0.0.0"),
            port,
            request_timeout: Duration::from_secs(timeout_secs),
            app_url: or_default("APP_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `DATABASE_URL` for the admin tooling, which talks to Postgres directly.
pub fn database_url() -> Result<String, ConfigError> {
    dotenvy::dotenv().ok();
    env::var("DATABASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing("DATABASE_URL"))
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &'static str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
