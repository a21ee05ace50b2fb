//! Area context around a location (`POST /context`)

use std::collections::BTreeMap;

use domain::{Coordinate, SearchRadius};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

fn default_radius() -> SearchRadius {
    SearchRadius::Meters(500)
}

fn valid_radius(radius: &SearchRadius) -> Result<(), ValidationError> {
    radius.meters().map(|_| ()).map_err(|e| {
        let mut err = ValidationError::new("radius");
        err.message = Some(e.to_string().into());
        err
    })
}

/// Describe the surroundings of a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContextRequest {
    #[validate(nested)]
    pub location: Coordinate,
    #[serde(default = "default_radius")]
    #[validate(custom(function = "valid_radius"))]
    pub radius: SearchRadius,
    pub categories: Option<Vec<String>>,
    /// Free-text hint about what the caller is interested in
    pub context: Option<String>,
}

impl ContextRequest {
    pub fn new(location: Coordinate, radius: impl Into<SearchRadius>) -> Self {
        Self {
            location,
            radius: radius.into(),
            categories: None,
            context: None,
        }
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Named places grouped by bucket
///
/// The well-known buckets are always present; anything else the server
/// sends is kept in `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevantPlaces {
    #[serde(default)]
    pub restaurants: Vec<String>,
    #[serde(default)]
    pub hotels: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub transportation: Vec<String>,
    #[serde(default)]
    pub shops: Vec<String>,
    #[serde(default)]
    pub attractions: Vec<String>,
    #[serde(default)]
    pub leisure: Vec<String>,
    #[serde(default)]
    pub offices: Vec<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl RelevantPlaces {
    /// Bucket names holding at least one place, well-known buckets first
    pub fn non_empty_buckets(&self) -> Vec<&str> {
        let known = [
            ("restaurants", &self.restaurants),
            ("hotels", &self.hotels),
            ("services", &self.services),
            ("transportation", &self.transportation),
            ("shops", &self.shops),
            ("attractions", &self.attractions),
            ("leisure", &self.leisure),
            ("offices", &self.offices),
        ];

        let extra = self.other.iter().filter_map(|(name, value)| {
            value
                .as_array()
                .filter(|items| !items.is_empty())
                .map(|_| name.as_str())
        });

        known
            .into_iter()
            .filter(|(_, places)| !places.is_empty())
            .map(|(name, _)| name)
            .chain(extra)
            .collect()
    }

    /// Total number of named places across the well-known buckets
    pub fn len(&self) -> usize {
        [
            &self.restaurants,
            &self.hotels,
            &self.services,
            &self.transportation,
            &self.shops,
            &self.attractions,
            &self.leisure,
            &self.offices,
        ]
        .iter()
        .map(|bucket| bucket.len())
        .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Description of an area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextResponse {
    pub area_description: String,
    #[serde(default)]
    pub relevant_places: RelevantPlaces,
    pub location: Coordinate,
    pub search_radius: SearchRadius,
    #[serde(default)]
    pub total_places_found: u32,
    pub context_insights: Option<String>,
}
