//! Tracing subscriber setup

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directives (e.g. "info", "integration_camino=debug");
    /// `RUST_LOG` takes precedence when set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Colored output for the plain format
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

const fn default_ansi() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            format: LogFormat::default(),
            ansi: default_ansi(),
        }
    }
}

impl TelemetryConfig {
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Build the filter, preferring `RUST_LOG` over the configured directives
    pub fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_filter))
            .map_err(|e| TelemetryError::Filter(format!("{}: {e}", self.log_filter)))
    }
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter {0}")]
    Filter(String),

    #[error("Failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global tracing subscriber
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = config.env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Plain => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(config.ansi)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.format, LogFormat::Plain);
        assert!(config.ansi);
    }

    #[test]
    fn test_format_deserialization() {
        let config: TelemetryConfig = toml::from_str(r#"format = "json""#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_env_filter_accepts_directives() {
        let config = TelemetryConfig::default().with_log_filter("integration_camino=debug,warn");
        assert!(config.env_filter().is_ok());
    }
}
