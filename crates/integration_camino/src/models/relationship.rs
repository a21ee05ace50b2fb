//! Spatial relationship between two points (`POST /relationship`)

use domain::Coordinate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::journey::{Analysis, RouteSegment};

/// Facet of the relationship the server should compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipFacet {
    Distance,
    Direction,
    TravelTime,
    Description,
}

impl RelationshipFacet {
    pub const ALL: [Self; 4] = [
        Self::Distance,
        Self::Direction,
        Self::TravelTime,
        Self::Description,
    ];
}

fn default_facets() -> Vec<RelationshipFacet> {
    RelationshipFacet::ALL.to_vec()
}

/// Relationship request between `start` and `end`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RelationshipRequest {
    #[validate(nested)]
    pub start: Coordinate,
    #[validate(nested)]
    pub end: Coordinate,
    #[serde(default = "default_facets")]
    pub include: Vec<RelationshipFacet>,
}

impl RelationshipRequest {
    /// Request every facet
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start,
            end,
            include: default_facets(),
        }
    }

    #[must_use]
    pub fn with_facets(mut self, include: impl IntoIterator<Item = RelationshipFacet>) -> Self {
        self.include = include.into_iter().collect();
        self
    }
}

/// Relationship facts; only the requested facets are populated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipResponse {
    /// Human readable, e.g. `"1.2 km"`
    pub distance: Option<String>,
    pub direction: Option<String>,
    pub walking_time: Option<String>,
    pub driving_time: Option<String>,
    pub actual_distance_km: Option<f64>,
    pub actual_distance_meters: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub description: Option<String>,
    pub route_segments: Option<Vec<RouteSegment>>,
    pub analysis: Option<Analysis>,
}

impl RelationshipResponse {
    /// Distance in meters from whichever numeric field the server filled
    pub fn distance_meters(&self) -> Option<f64> {
        self.actual_distance_meters
            .or_else(|| self.actual_distance_km.map(|km| km * 1000.0))
    }
}
