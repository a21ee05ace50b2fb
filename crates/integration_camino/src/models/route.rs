//! Point-to-point routing (`POST /route`)

use std::fmt;

use domain::{Coordinate, TransportMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Routing profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    #[default]
    Foot,
    Car,
    Bike,
}

impl RouteMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Foot => "foot",
            Self::Car => "car",
            Self::Bike => "bike",
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TransportMode> for RouteMode {
    /// Transit has no routing profile of its own and falls back to foot
    fn from(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Driving => Self::Car,
            TransportMode::Cycling => Self::Bike,
            TransportMode::Walking | TransportMode::Transit => Self::Foot,
        }
    }
}

/// Route between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RouteRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub start_lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub start_lon: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub end_lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub end_lon: f64,
    #[serde(default)]
    pub mode: RouteMode,
    pub include_instructions: Option<bool>,
    pub include_geometry: Option<bool>,
}

impl RouteRequest {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start_lat: start.lat(),
            start_lon: start.lon(),
            end_lat: end.lat(),
            end_lon: end.lon(),
            mode: RouteMode::default(),
            include_instructions: None,
            include_geometry: None,
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: RouteMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_instructions(mut self, include: bool) -> Self {
        self.include_instructions = Some(include);
        self
    }

    #[must_use]
    pub const fn with_geometry(mut self, include: bool) -> Self {
        self.include_geometry = Some(include);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub total_distance_meters: f64,
    pub total_duration_seconds: f64,
}

/// Routing result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub summary: RouteSummary,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub geometry: Option<Value>,
    #[serde(default)]
    pub include_geometry: bool,
}
