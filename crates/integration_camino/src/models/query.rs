//! Natural-language place query (`GET /query`)

use std::collections::BTreeMap;
use std::fmt;

use domain::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use super::{default_true, non_blank};

const fn default_limit() -> u32 {
    20
}

/// Ranking depth requested from the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    #[default]
    Basic,
    Advanced,
}

impl QueryMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query for places matching a natural-language description
///
/// `lat` and `lon` form the optional anchor and must be given together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_anchor"))]
pub struct QueryRequest {
    #[validate(custom(function = "non_blank"))]
    pub query: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: Option<f64>,
    #[validate(range(min = 1))]
    pub radius: Option<u32>,
    #[serde(default = "default_true")]
    pub rank: bool,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub answer: bool,
    #[serde(default)]
    pub mode: QueryMode,
}

fn validate_anchor(request: &QueryRequest) -> Result<(), ValidationError> {
    if request.lat.is_some() == request.lon.is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("incomplete_anchor");
    err.message = Some("lat and lon must be provided together".into());
    Err(err)
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            lat: None,
            lon: None,
            radius: None,
            rank: true,
            limit: default_limit(),
            offset: 0,
            answer: false,
            mode: QueryMode::default(),
        }
    }

    #[must_use]
    pub fn near(mut self, anchor: Coordinate) -> Self {
        self.lat = Some(anchor.lat());
        self.lon = Some(anchor.lon());
        self
    }

    #[must_use]
    pub const fn with_radius(mut self, meters: u32) -> Self {
        self.radius = Some(meters);
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn with_answer(mut self, answer: bool) -> Self {
        self.answer = answer;
        self
    }

    #[must_use]
    pub const fn with_rank(mut self, rank: bool) -> Self {
        self.rank = rank;
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: QueryMode) -> Self {
        self.mode = mode;
        self
    }

    /// The anchor point, when both halves are set
    pub fn anchor(&self) -> Option<Coordinate> {
        Some(Coordinate::new_unchecked(self.lat?, self.lon?))
    }

    /// Query-string parameters in wire order; unset optionals are omitted
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", self.query.clone())];
        if let Some(lat) = self.lat {
            params.push(("lat", lat.to_string()));
        }
        if let Some(lon) = self.lon {
            params.push(("lon", lon.to_string()));
        }
        if let Some(radius) = self.radius {
            params.push(("radius", radius.to_string()));
        }
        params.extend([
            ("rank", self.rank.to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("answer", self.answer.to_string()),
            ("mode", self.mode.as_str().to_string()),
        ]);
        params
    }
}

impl From<&str> for QueryRequest {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for QueryRequest {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}

/// A place matching a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: Coordinate,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    pub name: String,
    pub amenity: Option<String>,
    pub category: Option<String>,
    pub confidence: Option<f64>,
    pub relevance_rank: Option<u32>,
    pub address: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

impl QueryResult {
    /// Best available category label: `category`, then `amenity`, then the
    /// `amenity` tag
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_deref()
            .or(self.amenity.as_deref())
            .or_else(|| self.tags.get("amenity").map(String::as_str))
    }
}

/// Paging information for a query response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_results: u32,
    pub limit: u32,
    pub offset: u32,
    pub returned_count: u32,
    pub has_more: bool,
}

/// Query results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    #[serde(default)]
    pub results: Vec<QueryResult>,
    #[serde(default)]
    pub ai_ranked: bool,
    #[serde(default)]
    pub pagination: Pagination,
    pub answer: Option<String>,
}
