//! Camino client error types

use domain::DomainError;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::ValidationErrors;

/// Free-form structured context attached to an error
pub type ErrorDetails = Map<String, Value>;

/// Synthetic status reported when a request timed out
pub const TIMEOUT_STATUS: u16 = 504;

/// Synthetic status reported when no response was received
pub const CONNECTION_STATUS: u16 = 503;

/// Errors that can occur when talking to the Camino API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaminoError {
    /// Input rejected locally or response did not match the schema
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        details: ErrorDetails,
    },

    /// API key missing or rejected (HTTP 401)
    #[error("Authentication failed (HTTP {status_code}): {message}")]
    Authentication {
        message: String,
        status_code: u16,
        response: Option<Value>,
        details: ErrorDetails,
    },

    /// Too many requests (HTTP 429)
    #[error("Rate limit exceeded (HTTP {status_code}): {message}")]
    RateLimit {
        message: String,
        status_code: u16,
        /// Seconds the server asked us to wait
        retry_after: Option<u64>,
        response: Option<Value>,
        details: ErrorDetails,
    },

    /// Any other non-success outcome, including transport failures
    #[error("API error (HTTP {status_code}): {message}")]
    Api {
        message: String,
        status_code: u16,
        response: Option<Value>,
        details: ErrorDetails,
    },
}

impl CaminoError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: ErrorDetails::new(),
        }
    }

    pub fn api(status_code: u16, message: impl Into<String>, response: Option<Value>) -> Self {
        Self::Api {
            message: message.into(),
            status_code,
            response,
            details: ErrorDetails::new(),
        }
    }

    /// A request that never produced an HTTP response
    pub fn transport(timed_out: bool, message: impl Into<String>) -> Self {
        let (status_code, kind) = if timed_out {
            (TIMEOUT_STATUS, "timeout")
        } else {
            (CONNECTION_STATUS, "connection")
        };
        let mut details = ErrorDetails::new();
        details.insert("transport".to_string(), Value::from(kind));

        Self::Api {
            message: message.into(),
            status_code,
            response: None,
            details,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Authentication { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Api { message, .. } => message,
        }
    }

    pub const fn details(&self) -> &ErrorDetails {
        match self {
            Self::Validation { details, .. }
            | Self::Authentication { details, .. }
            | Self::RateLimit { details, .. }
            | Self::Api { details, .. } => details,
        }
    }

    /// HTTP status (real or synthetic); `None` for local validation
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Validation { .. } => None,
            Self::Authentication { status_code, .. }
            | Self::RateLimit { status_code, .. }
            | Self::Api { status_code, .. } => Some(*status_code),
        }
    }

    pub const fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Parsed response body, or the raw text when it was not JSON
    pub const fn response(&self) -> Option<&Value> {
        match self {
            Self::Validation { .. } => None,
            Self::Authentication { response, .. }
            | Self::RateLimit { response, .. }
            | Self::Api { response, .. } => response.as_ref(),
        }
    }

    /// Whether the transport should try again
    ///
    /// Server errors and transport failures are retried. A rate limit is
    /// retried only when the server did not say how long to wait.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status_code, .. } => *status_code >= 500,
            Self::RateLimit { retry_after, .. } => retry_after.is_none(),
            Self::Validation { .. } | Self::Authentication { .. } => false,
        }
    }
}

impl From<ValidationErrors> for CaminoError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .errors()
            .keys()
            .map(ToString::to_string)
            .collect();
        fields.sort();

        let mut details = ErrorDetails::new();
        details.insert(
            "fields".to_string(),
            Value::Array(fields.into_iter().map(Value::String).collect()),
        );

        Self::Validation {
            message: errors.to_string(),
            details,
        }
    }
}

impl From<DomainError> for CaminoError {
    fn from(err: DomainError) -> Self {
        Self::validation(err.to_string())
    }
}
