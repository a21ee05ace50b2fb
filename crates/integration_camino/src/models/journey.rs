//! Multi-waypoint journey planning (`POST /journey`)

use domain::{Coordinate, TransportMode};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::default_true;

/// Where a waypoint is: coordinates or free text for the server to geocode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaypointLocation {
    Coordinate(Coordinate),
    Address { address: String },
}

/// One stop of a journey; the wire form is flat
/// (`{"lat":..,"lon":..,"purpose":..}` or `{"address":..}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(flatten)]
    pub location: WaypointLocation,
    pub purpose: Option<String>,
    pub duration_minutes: Option<u32>,
    pub arrival_time: Option<String>,
}

impl Waypoint {
    pub const fn at(location: Coordinate) -> Self {
        Self {
            location: WaypointLocation::Coordinate(location),
            purpose: None,
            duration_minutes: None,
            arrival_time: None,
        }
    }

    pub fn address(address: impl Into<String>) -> Self {
        Self {
            location: WaypointLocation::Address {
                address: address.into(),
            },
            purpose: None,
            duration_minutes: None,
            arrival_time: None,
        }
    }

    #[must_use]
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub const fn coordinate(&self) -> Option<Coordinate> {
        match self.location {
            WaypointLocation::Coordinate(c) => Some(c),
            WaypointLocation::Address { .. } => None,
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        match &self.location {
            WaypointLocation::Coordinate(c) if c.validate().is_err() => {
                Err(waypoint_error("waypoint coordinate out of range"))
            },
            WaypointLocation::Address { address } if address.trim().is_empty() => {
                Err(waypoint_error("waypoint address must not be empty"))
            },
            _ => Ok(()),
        }
    }
}

fn waypoint_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("waypoint");
    err.message = Some(message.into());
    err
}

fn valid_waypoints(waypoints: &[Waypoint]) -> Result<(), ValidationError> {
    waypoints.iter().try_for_each(Waypoint::check)
}

/// Journey constraints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct JourneyConstraints {
    #[serde(default, alias = "transport_mode")]
    pub transport: TransportMode,
    /// Free text, e.g. `"2h"` or `"90 minutes"`
    pub time_budget: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    pub avoid_tolls: Option<bool>,
    pub avoid_highways: Option<bool>,
    #[validate(range(min = 1))]
    pub max_duration: Option<u32>,
}

impl JourneyConstraints {
    pub fn new(transport: TransportMode) -> Self {
        Self {
            transport,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_time_budget(mut self, budget: impl Into<String>) -> Self {
        self.time_budget = Some(budget.into());
        self
    }

    #[must_use]
    pub fn with_preferences<I, S>(mut self, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferences = preferences.into_iter().map(Into::into).collect();
        self
    }
}

/// Plan a journey through two or more waypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct JourneyRequest {
    #[validate(
        length(min = 2, message = "a journey needs at least two waypoints"),
        custom(function = "valid_waypoints")
    )]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    #[validate(nested)]
    pub constraints: JourneyConstraints,
    #[serde(default = "default_true")]
    pub optimize: bool,
}

impl JourneyRequest {
    pub fn new(waypoints: Vec<Waypoint>, constraints: JourneyConstraints) -> Self {
        Self {
            waypoints,
            constraints,
            optimize: true,
        }
    }

    #[must_use]
    pub const fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }
}

/// A waypoint as echoed back in a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledLocation {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub address: Option<String>,
    pub purpose: Option<String>,
}

/// One leg between consecutive stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub from: LabeledLocation,
    pub to: LabeledLocation,
    pub distance_km: f64,
    pub estimated_time: String,
    pub duration_minutes: Option<f64>,
    pub instructions: Option<Vec<String>>,
}

/// Server-side commentary on a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    #[serde(default)]
    pub optimization_opportunities: Vec<String>,
}

/// Journey plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyResponse {
    pub feasible: bool,
    pub total_distance_km: f64,
    pub total_time_minutes: f64,
    #[serde(default)]
    pub total_time_formatted: String,
    pub transport_mode: TransportMode,
    #[serde(default)]
    pub route_segments: Vec<RouteSegment>,
    pub optimized_order: Option<Vec<usize>>,
    #[serde(default)]
    pub analysis: Analysis,
}

impl JourneyResponse {
    pub fn total_distance_meters(&self) -> f64 {
        self.total_distance_km * 1000.0
    }

    pub fn total_duration_seconds(&self) -> f64 {
        self.total_time_minutes * 60.0
    }
}
