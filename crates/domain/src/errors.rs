//! Domain-level errors

use thiserror::Error;

/// Errors that can occur when constructing domain values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Latitude or longitude out of range
    #[error("Invalid coordinates ({lat}, {lon}): latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates {
        /// Rejected latitude
        lat: f64,
        /// Rejected longitude
        lon: f64,
    },

    /// Text could not be read as `lat,lon`
    #[error("Invalid coordinate format: {0} (expected \"lat,lon\")")]
    InvalidCoordinateFormat(String),

    /// Radius text with unknown unit or non-positive value
    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    /// Transport mode not recognised
    #[error("Unknown transport mode: {0}")]
    UnknownTransportMode(String),
}
