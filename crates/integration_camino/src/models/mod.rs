//! Request and response models for the Camino API
//!
//! Requests validate themselves (via `validator`) before any network call.
//! Responses tolerate unknown fields; a missing or mistyped required field
//! is reported as [`CaminoError::Validation`].

mod context;
mod journey;
mod query;
mod relationship;
mod route;
mod search;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::ValidationError;

use crate::error::CaminoError;

pub use context::{ContextRequest, ContextResponse, RelevantPlaces};
pub use journey::{
    Analysis, JourneyConstraints, JourneyRequest, JourneyResponse, LabeledLocation, RouteSegment,
    Waypoint, WaypointLocation,
};
pub use query::{Pagination, QueryMode, QueryRequest, QueryResponse, QueryResult};
pub use relationship::{RelationshipFacet, RelationshipRequest, RelationshipResponse};
pub use route::{RouteMode, RouteRequest, RouteResponse, RouteSummary};
pub use search::{SearchRequest, SearchResponse, SearchResult};

/// How unset (`None`) fields are rendered when a model becomes a payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadMode {
    /// Drop unset fields; declared defaults are still present
    #[default]
    ExcludeAbsent,
    /// Keep unset fields as explicit `null`
    IncludeAbsent,
}

/// Serialize a model into a JSON payload
///
/// # Errors
///
/// Returns a validation error if the model cannot be represented as JSON
/// (e.g. a non-finite float).
pub fn to_payload<T: Serialize>(model: &T, mode: PayloadMode) -> Result<Value, CaminoError> {
    let value = serde_json::to_value(model)
        .map_err(|e| CaminoError::validation(format!("Failed to serialize payload: {e}")))?;

    Ok(match mode {
        PayloadMode::IncludeAbsent => value,
        PayloadMode::ExcludeAbsent => strip_nulls(value),
    })
}

/// Parse a JSON body into a model
///
/// # Errors
///
/// Returns a validation error naming the serde failure when a required field
/// is missing or has the wrong type.
pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, CaminoError> {
    serde_json::from_str(body)
        .map_err(|e| CaminoError::validation(format!("Invalid response body: {e}")))
}

/// Parse an already-decoded JSON value into a model
///
/// # Errors
///
/// Same as [`parse_json`].
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, CaminoError> {
    serde_json::from_value(value).map_err(|e| CaminoError::validation(e.to_string()))
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

/// Reject empty or whitespace-only text
pub(crate) fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) const fn default_true() -> bool {
    true
}
