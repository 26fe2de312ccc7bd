//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_STORAGE_PATH: &str = "auth-storage.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL '{0}' (expected http:// or https://)")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    /// `AUTH_REQUEST_TIMEOUT_SECS` and `AUTH_CONNECT_TIMEOUT_SECS`; unset or
    /// unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            request_secs: env_parse_u64("AUTH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("AUTH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub storage_path: PathBuf,
    pub timeouts: Timeouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `BACKEND_URL`: API base URL, default `http://localhost:8000`
    /// - `AUTH_STORAGE_PATH`: persisted session record, default `auth-storage.json`
    /// - `AUTH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AUTH_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when `BACKEND_URL` is not an
    /// http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(&std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()))?;
        let storage_path = std::env::var("AUTH_STORAGE_PATH").map_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);

        Ok(Self { base_url, storage_path, timeouts: Timeouts::from_env() })
    }
}

/// Trim whitespace and trailing slashes and require an http(s) scheme.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] for any other scheme.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
