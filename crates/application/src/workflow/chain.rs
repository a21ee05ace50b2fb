//! Context -> query -> journey chaining

use std::fmt;
use std::sync::Arc;

use domain::{Coordinate, TransportMode};
use futures::future::try_join_all;
use integration_camino::{
    CaminoClient, CaminoError, ContextRequest, JourneyConstraints, JourneyRequest,
    JourneyResponse, QueryRequest, QueryResult, Waypoint,
};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::selection::{PoiCandidate, SelectedPoi, select_pois};
use super::settings::SettingsError;
use super::WorkflowSettings;

/// Categories chosen for an area, and how they were chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discovery {
    pub categories: Vec<String>,
    pub area_description: Option<String>,
    /// Set when the context lookup failed and fallback categories were used
    pub degraded: Option<String>,
}

/// Results of one category query
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryResults {
    pub category: String,
    pub results: Vec<QueryResult>,
}

impl CategoryResults {
    /// Flatten into scoring candidates, keeping category order
    pub fn candidates(groups: &[Self]) -> Vec<PoiCandidate> {
        groups
            .iter()
            .flat_map(|group| {
                group.results.iter().map(|place| PoiCandidate {
                    category: group.category.clone(),
                    place: place.clone(),
                })
            })
            .collect()
    }
}

/// Output of [`QuickChain::context_to_query`]
#[derive(Debug, Clone, PartialEq)]
pub struct ContextQuery {
    pub discovery: Discovery,
    pub groups: Vec<CategoryResults>,
}

impl ContextQuery {
    pub fn total_results(&self) -> usize {
        self.groups.iter().map(|g| g.results.len()).sum()
    }
}

/// Output of [`QuickChain::query_to_journey`]
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyPlan {
    pub selected: Vec<SelectedPoi>,
    pub journey: JourneyResponse,
}

/// Two-step chaining helpers built on [`CaminoClient`]
pub struct QuickChain {
    client: Arc<dyn CaminoClient>,
    settings: WorkflowSettings,
}

impl fmt::Debug for QuickChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuickChain")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl QuickChain {
    pub fn new(client: Arc<dyn CaminoClient>) -> Self {
        Self {
            client,
            settings: WorkflowSettings::default(),
        }
    }

    /// Chain with custom settings
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn with_settings(
        client: Arc<dyn CaminoClient>,
        settings: WorkflowSettings,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self { client, settings })
    }

    pub const fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Decide which categories to query around `location`
    ///
    /// A failed context lookup never propagates: the fallback categories are
    /// used and the failure is recorded in [`Discovery::degraded`].
    #[instrument(skip(self, requested), fields(location = %location))]
    pub async fn discover_categories(
        &self,
        location: Coordinate,
        radius: u32,
        requested: &[String],
    ) -> Discovery {
        let context = self.client.context(ContextRequest::new(location, radius)).await;

        match context {
            Ok(context) => {
                let buckets = context.relevant_places.non_empty_buckets();
                let categories = if !requested.is_empty() {
                    requested.to_vec()
                } else if buckets.is_empty() {
                    self.settings.default_categories.clone()
                } else {
                    buckets.into_iter().map(String::from).collect()
                };
                debug!(?categories, "Categories discovered");
                Discovery {
                    categories,
                    area_description: Some(context.area_description),
                    degraded: None,
                }
            },
            Err(e) => {
                warn!(error = %e, "Context lookup failed, using fallback categories");
                Discovery {
                    categories: self.settings.fallback_categories.clone(),
                    area_description: None,
                    degraded: Some(format!("context unavailable: {e}")),
                }
            },
        }
    }

    /// Query every category around `location`
    ///
    /// Queries run concurrently; groups come back in category order. The
    /// first failure (in category order) is returned and nothing is merged.
    #[instrument(skip(self, categories), fields(location = %location, categories = categories.len()))]
    pub async fn query_categories(
        &self,
        location: Coordinate,
        radius: u32,
        categories: &[String],
        limit: u32,
    ) -> Result<Vec<CategoryResults>, CaminoError> {
        let queries = categories.iter().map(|category| {
            let request = QueryRequest::new(category.as_str())
                .near(location)
                .with_radius(radius)
                .with_limit(limit);
            async move {
                let response = self.client.query(request).await?;
                Ok::<_, CaminoError>(CategoryResults {
                    category: category.clone(),
                    results: response.results,
                })
            }
        });

        try_join_all(queries).await
    }

    /// Discover categories for an area, then query each of them
    pub async fn context_to_query(
        &self,
        location: Coordinate,
        radius: u32,
        requested: &[String],
    ) -> Result<ContextQuery, CaminoError> {
        let discovery = self.discover_categories(location, radius, requested).await;
        let groups = self
            .query_categories(
                location,
                radius,
                &discovery.categories,
                self.settings.per_category_limit,
            )
            .await?;
        Ok(ContextQuery { discovery, groups })
    }

    /// Build the journey request for a start point and chosen stops
    pub fn journey_request(
        &self,
        origin: Coordinate,
        selected: &[SelectedPoi],
        transport: TransportMode,
    ) -> JourneyRequest {
        let waypoints = std::iter::once(Waypoint::at(origin).with_purpose("start"))
            .chain(selected.iter().map(|poi| {
                Waypoint::at(poi.location).with_purpose(format!("visit:{}", poi.category))
            }))
            .collect();

        let constraints = JourneyConstraints::new(transport)
            .with_time_budget(self.settings.time_budget.clone())
            .with_preferences(self.settings.preferences.iter().cloned());

        JourneyRequest::new(waypoints, constraints)
    }

    /// Select the best stops from `candidates` and plan a journey through them
    #[instrument(skip(self, candidates), fields(origin = %origin, candidates = candidates.len()))]
    pub async fn query_to_journey(
        &self,
        origin: Coordinate,
        candidates: &[PoiCandidate],
        transport: TransportMode,
        max_stops: usize,
    ) -> Result<JourneyPlan, CaminoError> {
        let selected = select_pois(origin, candidates, max_stops, &self.settings);
        if selected.is_empty() {
            return Err(CaminoError::validation("no places available to visit"));
        }

        let journey = self.plan_journey(origin, &selected, transport).await?;
        Ok(JourneyPlan { selected, journey })
    }

    /// Plan a journey from `origin` through already-selected stops
    pub async fn plan_journey(
        &self,
        origin: Coordinate,
        selected: &[SelectedPoi],
        transport: TransportMode,
    ) -> Result<JourneyResponse, CaminoError> {
        self.client
            .journey(self.journey_request(origin, selected, transport))
            .await
    }
}
