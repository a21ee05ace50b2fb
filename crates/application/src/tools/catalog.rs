//! Endpoint methods exposed as named, schema-described tools

use std::fmt;
use std::sync::Arc;

use integration_camino::{
    CaminoClient, CaminoError, ContextRequest, JourneyRequest, QueryRequest, RelationshipRequest,
    RouteRequest, SearchRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use validator::Validate;

use super::{RemoteToolServer, ToolError};

/// The tools offered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaminoTool {
    SearchPlaces,
    QueryLocations,
    CalculateDistance,
    GetLocationContext,
    PlanJourney,
    PlanRoute,
}

impl CaminoTool {
    pub const ALL: [Self; 6] = [
        Self::SearchPlaces,
        Self::QueryLocations,
        Self::CalculateDistance,
        Self::GetLocationContext,
        Self::PlanJourney,
        Self::PlanRoute,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::SearchPlaces => "search_places",
            Self::QueryLocations => "query_locations",
            Self::CalculateDistance => "calculate_distance",
            Self::GetLocationContext => "get_location_context",
            Self::PlanJourney => "plan_journey",
            Self::PlanRoute => "plan_route",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::SearchPlaces => "Find places by name or address",
            Self::QueryLocations => {
                "Search for places using natural language, optionally near a point"
            },
            Self::CalculateDistance => {
                "Distance, direction and travel time between two points"
            },
            Self::GetLocationContext => "Describe the area around a point and what is nearby",
            Self::PlanJourney => "Plan an optimized trip through several stops",
            Self::PlanRoute => "Route between two points for foot, car or bike",
        }
    }

    /// JSON schema of the tool's arguments
    pub fn input_schema(self) -> Value {
        let point = json!({
            "type": "object",
            "properties": {
                "lat": {"type": "number", "minimum": -90, "maximum": 90},
                "lon": {"type": "number", "minimum": -180, "maximum": 180}
            },
            "required": ["lat", "lon"]
        });

        match self {
            Self::SearchPlaces => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Place name or address"},
                    "limit": {"type": "integer", "minimum": 1, "maximum": 100}
                },
                "required": ["query"]
            }),
            Self::QueryLocations => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "What to look for, e.g. \"quiet cafes\""},
                    "lat": {"type": "number"},
                    "lon": {"type": "number"},
                    "radius": {"type": "integer", "minimum": 1, "description": "Meters"},
                    "rank": {"type": "boolean", "default": true},
                    "limit": {"type": "integer", "minimum": 1, "maximum": 100, "default": 20},
                    "offset": {"type": "integer", "minimum": 0, "default": 0},
                    "answer": {"type": "boolean", "default": false},
                    "mode": {"type": "string", "enum": ["basic", "advanced"], "default": "basic"}
                },
                "required": ["query"]
            }),
            Self::CalculateDistance => json!({
                "type": "object",
                "properties": {
                    "start": point,
                    "end": point,
                    "include": {
                        "type": "array",
                        "items": {"type": "string", "enum": ["distance", "direction", "travel_time", "description"]}
                    }
                },
                "required": ["start", "end"]
            }),
            Self::GetLocationContext => json!({
                "type": "object",
                "properties": {
                    "location": point,
                    "radius": {
                        "oneOf": [{"type": "integer", "minimum": 1}, {"type": "string"}],
                        "description": "Meters, or text such as \"1.5km\"",
                        "default": 500
                    },
                    "categories": {"type": "array", "items": {"type": "string"}},
                    "context": {"type": "string"}
                },
                "required": ["location"]
            }),
            Self::PlanJourney => json!({
                "type": "object",
                "properties": {
                    "waypoints": {
                        "type": "array",
                        "minItems": 2,
                        "items": {
                            "type": "object",
                            "properties": {
                                "lat": {"type": "number"},
                                "lon": {"type": "number"},
                                "address": {"type": "string"},
                                "purpose": {"type": "string"},
                                "duration_minutes": {"type": "integer", "minimum": 0}
                            }
                        }
                    },
                    "constraints": {
                        "type": "object",
                        "properties": {
                            "transport": {"type": "string", "enum": ["walking", "driving", "cycling", "transit"]},
                            "time_budget": {"type": "string"},
                            "preferences": {"type": "array", "items": {"type": "string"}}
                        }
                    },
                    "optimize": {"type": "boolean", "default": true}
                },
                "required": ["waypoints"]
            }),
            Self::PlanRoute => json!({
                "type": "object",
                "properties": {
                    "start_lat": {"type": "number"},
                    "start_lon": {"type": "number"},
                    "end_lat": {"type": "number"},
                    "end_lon": {"type": "number"},
                    "mode": {"type": "string", "enum": ["foot", "car", "bike"], "default": "foot"},
                    "include_instructions": {"type": "boolean"},
                    "include_geometry": {"type": "boolean"}
                },
                "required": ["start_lat", "start_lon", "end_lat", "end_lon"]
            }),
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Display for CaminoTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Advertised shape of a tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Dispatches tool calls onto a [`CaminoClient`]
pub struct ToolCatalog {
    client: Arc<dyn CaminoClient>,
    enabled: Vec<CaminoTool>,
}

impl fmt::Debug for ToolCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolCatalog")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl ToolCatalog {
    /// Catalog exposing every tool
    pub fn new(client: Arc<dyn CaminoClient>) -> Self {
        Self {
            client,
            enabled: CaminoTool::ALL.to_vec(),
        }
    }

    /// Restrict the catalog to the named tools
    ///
    /// # Errors
    ///
    /// Returns `UnknownTool` for a name that is not in the catalog.
    pub fn with_filter<I, S>(mut self, names: I) -> Result<Self, ToolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut enabled = Vec::new();
        for name in names {
            let name = name.as_ref();
            let tool =
                CaminoTool::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
            if !enabled.contains(&tool) {
                enabled.push(tool);
            }
        }
        self.enabled = enabled;
        Ok(self)
    }

    /// Catalog honouring the server's tool filter
    ///
    /// # Errors
    ///
    /// Same as [`with_filter`](Self::with_filter).
    pub fn for_server(
        client: Arc<dyn CaminoClient>,
        server: &RemoteToolServer,
    ) -> Result<Self, ToolError> {
        let catalog = Self::new(client);
        match &server.tool_filter {
            Some(filter) => catalog.with_filter(filter),
            None => Ok(catalog),
        }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.enabled.iter().map(|tool| tool.definition()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        CaminoTool::from_name(name).is_some_and(|tool| self.enabled.contains(&tool))
    }

    /// Invoke a tool by name with JSON arguments and return the JSON response
    ///
    /// # Errors
    ///
    /// `UnknownTool` for names outside the catalog (or filtered out),
    /// `InvalidArguments` when the arguments fail to parse or validate, and
    /// `Camino` when the API call fails.
    #[instrument(skip(self, arguments))]
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let tool = CaminoTool::from_name(name)
            .filter(|tool| self.enabled.contains(tool))
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        debug!(%tool, "Dispatching tool call");

        match tool {
            CaminoTool::SearchPlaces => {
                let request: SearchRequest = match arguments {
                    Value::String(query) => query.into(),
                    other => parse_arguments(tool, other)?,
                };
                validate_arguments(tool, &request)?;
                to_json(self.client.search(request).await?)
            },
            CaminoTool::QueryLocations => {
                let request: QueryRequest = match arguments {
                    Value::String(query) => query.into(),
                    other => parse_arguments(tool, other)?,
                };
                validate_arguments(tool, &request)?;
                to_json(self.client.query(request).await?)
            },
            CaminoTool::CalculateDistance => {
                let request: RelationshipRequest = parse_arguments(tool, arguments)?;
                validate_arguments(tool, &request)?;
                to_json(self.client.relationship(request).await?)
            },
            CaminoTool::GetLocationContext => {
                let request: ContextRequest = parse_arguments(tool, arguments)?;
                validate_arguments(tool, &request)?;
                to_json(self.client.context(request).await?)
            },
            CaminoTool::PlanJourney => {
                let request: JourneyRequest = parse_arguments(tool, arguments)?;
                validate_arguments(tool, &request)?;
                to_json(self.client.journey(request).await?)
            },
            CaminoTool::PlanRoute => {
                let request: RouteRequest = parse_arguments(tool, arguments)?;
                validate_arguments(tool, &request)?;
                to_json(self.client.route(request).await?)
            },
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(tool: CaminoTool, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool: tool.name().to_string(),
        message: e.to_string(),
    })
}

fn validate_arguments<T: Validate>(tool: CaminoTool, request: &T) -> Result<(), ToolError> {
    request.validate().map_err(|e| ToolError::InvalidArguments {
        tool: tool.name().to_string(),
        message: e.to_string(),
    })
}

fn to_json<T: Serialize>(response: T) -> Result<Value, ToolError> {
    serde_json::to_value(response)
        .map_err(|e| CaminoError::validation(format!("Failed to encode response: {e}")).into())
}
