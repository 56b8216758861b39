//! HTTP client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the base URL.
pub const URL_ENV: &str = "SESSION_BRIDGE_URL";
/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "SESSION_BRIDGE_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:4096";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Settings for [`HttpSessionClient`](crate::HttpSessionClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Base URL of the session service.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: Some(concat!("session-bridge/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl HttpClientConfig {
    /// Config pointing at `base_url`, other settings default.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by the process environment.
    ///
    /// # Errors
    /// Returns error if an override cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`.
    ///
    /// # Errors
    /// Returns error if an override cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(URL_ENV).filter(|url| !url.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            config.timeout_secs =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: TIMEOUT_ENV.to_string(),
                        value: timeout.clone(),
                    })?;
        }
        Ok(config)
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
