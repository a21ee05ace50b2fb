//! Camino client configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::CaminoError;

/// Connection settings for the Camino API
#[derive(Clone, Serialize, Deserialize)]
pub struct CaminoConfig {
    /// API key sent as `X-API-Key` (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt for retryable failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff in seconds, doubled per attempt
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff: f64,

    /// Upper bound for a single backoff sleep
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.getcamino.ai".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_retry_backoff() -> f64 {
    1.0
}

const fn default_max_backoff_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("camino-ai-rust/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for CaminoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff: default_retry_backoff(),
            max_backoff_secs: default_max_backoff_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl std::fmt::Debug for CaminoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaminoConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("max_backoff_secs", &self.max_backoff_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl CaminoConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn with_retry_backoff(mut self, retry_backoff: f64) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Configuration pointed at a local mock server with near-zero backoff
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from("test-api-key")),
            base_url: base_url.into(),
            timeout_secs: 5,
            max_retries: 3,
            retry_backoff: 0.001,
            max_backoff_secs: 1,
            user_agent: default_user_agent(),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing key, an empty base URL, a
    /// zero timeout or a negative (or non-finite) backoff.
    pub fn validate(&self) -> Result<(), CaminoError> {
        if self.api_key().is_none_or(|key| key.trim().is_empty()) {
            return Err(CaminoError::validation("API key is required"));
        }
        if self.normalized_base_url().trim().is_empty() {
            return Err(CaminoError::validation("base_url must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(CaminoError::validation("timeout_secs must be positive"));
        }
        if !self.retry_backoff.is_finite() || self.retry_backoff < 0.0 {
            return Err(CaminoError::validation(
                "retry_backoff must be a non-negative number",
            ));
        }
        Ok(())
    }
}
