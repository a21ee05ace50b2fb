//! Infrastructure layer - Configuration loading and tracing setup
//!
//! Everything the binaries need before the first request: a layered
//! [`AppConfig`] and a tracing subscriber.

pub mod config;
pub mod telemetry;

pub use config::{API_KEY_ENV, AppConfig, ConfigError};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_tracing};
