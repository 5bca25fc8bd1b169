//! # Client Configuration
//!
//! Base URL, API token, request timeout and retry policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::{SessionError, SessionResult};
use super::retry::RetryPolicy;

/// Environment variables read by [`ClientConfig::from_env`], in lookup order.
pub const URL_VARS: [&str; 2] = ["DIRECTUS_URL", "URL"];
pub const TOKEN_VARS: [&str; 2] = ["DIRECTUS_TOKEN", "TOKEN"];
pub const TIMEOUT_VAR: &str = "DIRECTUS_TIMEOUT_SECS";
pub const MAX_ATTEMPTS_VAR: &str = "DIRECTUS_MAX_ATTEMPTS";

/// Directus client configuration.
///
/// Only static API tokens are supported; use a restricted user where possible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Directus base url, e.g. `https://cms.example.com`
    pub url: String,

    /// Static API token sent as a bearer token
    pub token: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry policy for transient failures
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    /// Create a config with default timeout and retry policy
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            timeout_secs: default_timeout_secs(),
            retry: RetryPolicy::default(),
        }
    }

    /// Read the config from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> SessionResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> SessionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| -> Option<String> {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .find(|v| !v.trim().is_empty())
        };

        let token = first(&TOKEN_VARS[..]).ok_or_else(|| {
            SessionError::Config("API key not provided via variable or env (DIRECTUS_TOKEN)".into())
        })?;
        let url = first(&URL_VARS[..]).ok_or_else(|| {
            SessionError::Config("URL not provided via variable or env (DIRECTUS_URL)".into())
        })?;

        let mut config = Self::new(url, token);

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                SessionError::Config(format!("Invalid {}: {}", TIMEOUT_VAR, raw))
            })?;
        }
        if let Some(raw) = lookup(MAX_ATTEMPTS_VAR) {
            config.retry.max_attempts = raw.trim().parse().map_err(|_| {
                SessionError::Config(format!("Invalid {}: {}", MAX_ATTEMPTS_VAR, raw))
            })?;
        }

        Ok(config)
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate and normalize the config.
    ///
    /// Strips one trailing `/` from the url.
    pub fn validate(&self) -> SessionResult<Self> {
        if self.url.is_empty() {
            return Err(SessionError::Config("URL not provided".into()));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(SessionError::Config("URL must start with http(s)://".into()));
        }
        if self.token.is_empty() {
            return Err(SessionError::Config("API key not provided".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(SessionError::Config("retry.max_attempts must be at least 1".into()));
        }

        let mut normalized = self.clone();
        if let Some(stripped) = normalized.url.strip_suffix('/') {
            normalized.url = stripped.to_string();
        }
        Ok(normalized)
    }

    /// First characters of the token, for error messages
    pub fn token_hint(&self) -> String {
        self.token.chars().take(5).collect()
    }
}
