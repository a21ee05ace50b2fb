//! End-to-end area exploration: discover, query, select, plan

use std::fmt;
use std::sync::Arc;

use domain::{Coordinate, TransportMode};
use integration_camino::CaminoClient;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::chain::{CategoryResults, QuickChain};
use super::selection::{SelectedPoi, select_pois};
use super::settings::SettingsError;
use super::stage::{Stage, WorkflowState};
use super::WorkflowSettings;

/// Parameters of one exploration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreRequest {
    pub location: Coordinate,
    /// Categories to look for; empty lets the area context decide
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_radius")]
    pub radius: u32,
    /// Overrides the configured per-category query limit
    pub max_pois_per_category: Option<u32>,
    #[serde(default = "default_max_stops")]
    pub max_stops: usize,
    #[serde(default)]
    pub transport: TransportMode,
}

const fn default_radius() -> u32 {
    1000
}

const fn default_max_stops() -> usize {
    5
}

impl ExploreRequest {
    pub const fn new(location: Coordinate) -> Self {
        Self {
            location,
            categories: Vec::new(),
            radius: default_radius(),
            max_pois_per_category: None,
            max_stops: default_max_stops(),
            transport: TransportMode::Walking,
        }
    }
}

/// Journey metrics of a successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneySummary {
    pub feasible: bool,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub segments: usize,
    pub optimized_order: Option<Vec<usize>>,
    pub summary: String,
}

/// Outcome of [`AreaExplorer::explore_and_plan`]; failures are data, not errors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorationResult {
    pub success: bool,
    pub state: WorkflowState,
    /// Stages entered, in order
    pub stages: Vec<Stage>,
    pub categories: Vec<String>,
    pub area_description: Option<String>,
    pub degraded: Option<String>,
    pub total_pois_found: usize,
    pub pois_by_category: Vec<(String, usize)>,
    pub selected_pois: Vec<SelectedPoi>,
    pub journey: Option<JourneySummary>,
    pub error_message: Option<String>,
}

impl ExplorationResult {
    fn new() -> Self {
        Self {
            success: false,
            state: WorkflowState::start(),
            stages: vec![Stage::Discover],
            categories: Vec::new(),
            area_description: None,
            degraded: None,
            total_pois_found: 0,
            pois_by_category: Vec::new(),
            selected_pois: Vec::new(),
            journey: None,
            error_message: None,
        }
    }

    fn advance(&mut self) {
        self.state = std::mem::replace(&mut self.state, WorkflowState::Done).advance();
        if let Some(stage) = self.state.current_stage() {
            self.stages.push(stage);
        }
        self.success = self.state.is_done();
    }

    fn fail(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(stage = ?self.state.current_stage(), %message, "Exploration failed");
        self.state = self.state.fail(message.clone());
        self.error_message = Some(message);
        self.success = false;
        self
    }

    /// Stage at which the run failed, if it did
    pub const fn failed_stage(&self) -> Option<Stage> {
        match &self.state {
            WorkflowState::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Runs the whole exploration workflow in one call
pub struct AreaExplorer {
    chain: QuickChain,
}

impl fmt::Debug for AreaExplorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AreaExplorer")
            .field("chain", &self.chain)
            .finish()
    }
}

impl AreaExplorer {
    pub fn new(client: Arc<dyn CaminoClient>) -> Self {
        Self {
            chain: QuickChain::new(client),
        }
    }

    /// Explorer with custom settings
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn with_settings(
        client: Arc<dyn CaminoClient>,
        settings: WorkflowSettings,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            chain: QuickChain::with_settings(client, settings)?,
        })
    }

    /// Discover categories, query each, pick stops and plan a journey
    ///
    /// Never fails: any error ends the run in [`WorkflowState::Failed`] with
    /// the stage it happened in.
    #[instrument(skip(self, request), fields(location = %request.location, max_stops = request.max_stops))]
    pub async fn explore_and_plan(&self, request: ExploreRequest) -> ExplorationResult {
        let mut result = ExplorationResult::new();
        let origin = request.location;

        // Discover (degrades in place, never fails)
        let discovery = self
            .chain
            .discover_categories(origin, request.radius, &request.categories)
            .await;
        result.categories.clone_from(&discovery.categories);
        result.area_description = discovery.area_description;
        result.degraded = discovery.degraded;
        result.advance();

        // Query
        let limit = request
            .max_pois_per_category
            .unwrap_or(self.chain.settings().per_category_limit);
        let groups = match self
            .chain
            .query_categories(origin, request.radius, &result.categories, limit)
            .await
        {
            Ok(groups) => groups,
            Err(e) => return result.fail(e.to_string()),
        };
        result.pois_by_category = groups
            .iter()
            .map(|g| (g.category.clone(), g.results.len()))
            .collect();
        result.total_pois_found = groups.iter().map(|g| g.results.len()).sum();
        result.advance();

        // Select
        let candidates = CategoryResults::candidates(&groups);
        let selected = select_pois(origin, &candidates, request.max_stops, self.chain.settings());
        if selected.is_empty() {
            return result.fail("no places found for any category");
        }
        result.advance();

        // Plan
        let planned = self
            .chain
            .plan_journey(origin, &selected, request.transport)
            .await;
        result.selected_pois = selected;
        let journey = match planned {
            Ok(journey) => journey,
            Err(e) => return result.fail(e.to_string()),
        };

        result.journey = Some(JourneySummary {
            feasible: journey.feasible,
            distance_meters: journey.total_distance_meters(),
            duration_seconds: journey.total_duration_seconds(),
            segments: journey.route_segments.len(),
            optimized_order: journey.optimized_order,
            summary: journey.analysis.summary,
        });
        result.advance();

        info!(
            pois = result.total_pois_found,
            stops = result.selected_pois.len(),
            "Exploration complete"
        );
        result
    }
}
