//! Application configuration
//!
//! Values are layered: built-in defaults, then an optional `camino.toml`,
//! then `CAMINO_*` environment variables using `__` between sections
//! (`CAMINO_CAMINO__TIMEOUT_SECS=10`, `CAMINO_WORKFLOW__PER_CATEGORY_LIMIT=3`).
//! `CAMINO_API_KEY` fills the API key when no file or section variable sets it.

use std::path::Path;

use application::{RemoteToolServer, SettingsError, WorkflowSettings};
use integration_camino::CaminoConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::telemetry::TelemetryConfig;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "CAMINO";

/// Variable holding the API key
pub const API_KEY_ENV: &str = "CAMINO_API_KEY";

/// Base name of the optional config file
pub const CONFIG_FILE: &str = "camino";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid workflow settings: {0}")]
    Workflow(#[from] SettingsError),
}

/// Complete configuration for the CLI and embedding applications
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub camino: CaminoConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub workflow: WorkflowSettings,

    #[serde(default)]
    pub tool_server: RemoteToolServer,
}

impl AppConfig {
    /// Load from `camino.{toml,json,yaml}` in the working directory (if any)
    /// and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(env_source());
        Self::finish(builder)
    }

    /// Load from an explicit file (missing is not an error) and the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration file");
        let builder = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(env_source());
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_api_key(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Fill unset API keys, the client's first and the tool server's from it
    pub fn apply_api_key(&mut self, key: Option<String>) {
        if self.camino.api_key.is_none() {
            self.camino.api_key = key
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from);
        }
        if self.tool_server.api_key.is_none() {
            self.tool_server.api_key.clone_from(&self.camino.api_key);
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camino
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.workflow.validate()?;
        if self.tool_server.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "tool_server: timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
