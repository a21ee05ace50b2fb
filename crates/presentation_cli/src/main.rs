//! Camino CLI
//!
//! Command-line access to every endpoint, the exploration workflow and the
//! agent tool catalog. Responses are printed as pretty JSON on stdout.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use application::{AreaExplorer, ExploreRequest, ToolCatalog};
use clap::{Parser, Subcommand};
use domain::{Coordinate, SearchRadius, TransportMode};
use infrastructure::{AppConfig, init_tracing};
use integration_camino::{
    CaminoClient, ContextRequest, HttpCaminoClient, JourneyConstraints, JourneyRequest,
    QueryMode, QueryRequest, RelationshipRequest, RouteMode, RouteRequest, SearchRequest,
    Waypoint,
};
use serde::Serialize;
use tracing::debug;

/// Camino CLI
#[derive(Parser)]
#[command(name = "camino-cli")]
#[command(author, version, about = "Location intelligence from the command line", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./camino.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key (overrides the configuration)
    #[arg(long, env = "CAMINO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL (overrides the configuration)
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find places by name or address
    Search {
        query: String,

        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Natural-language place search
    ///
    /// Example: camino-cli query "quiet cafes" --near 40.7831,-73.9712 --radius 1000
    Query {
        query: String,

        /// Anchor point as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        near: Option<Coordinate>,

        /// Radius around the anchor in meters
        #[arg(short, long)]
        radius: Option<u32>,

        #[arg(short, long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,

        /// Ask for a generated answer alongside the results
        #[arg(long)]
        answer: bool,

        /// Keep server order instead of AI ranking
        #[arg(long)]
        no_rank: bool,

        #[arg(long)]
        advanced: bool,
    },

    /// Distance, direction and travel time between two points
    Relationship {
        /// Start as "lat,lon"
        #[arg(allow_hyphen_values = true)]
        start: Coordinate,

        /// End as "lat,lon"
        #[arg(allow_hyphen_values = true)]
        end: Coordinate,
    },

    /// Describe the area around a point
    Context {
        /// Location as "lat,lon"
        #[arg(allow_hyphen_values = true)]
        location: Coordinate,

        /// Meters or text such as "1.5km"
        #[arg(short, long, default_value = "500")]
        radius: String,

        /// Restrict to these categories
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Free-text purpose of the lookup
        #[arg(long)]
        context: Option<String>,
    },

    /// Plan a trip through several stops
    ///
    /// Each waypoint is "lat,lon" or an address.
    Journey {
        #[arg(required = true, num_args = 2.., allow_hyphen_values = true)]
        waypoints: Vec<String>,

        #[arg(short, long, default_value = "walking")]
        transport: TransportMode,

        /// e.g. "2h" or "90 minutes"
        #[arg(long)]
        time_budget: Option<String>,

        /// Keep the given stop order
        #[arg(long)]
        no_optimize: bool,
    },

    /// Route between two points
    Route {
        #[arg(allow_hyphen_values = true)]
        start: Coordinate,

        #[arg(allow_hyphen_values = true)]
        end: Coordinate,

        /// walking, driving or cycling
        #[arg(short, long, default_value = "walking")]
        mode: TransportMode,

        #[arg(long)]
        instructions: bool,

        #[arg(long)]
        geometry: bool,
    },

    /// Discover, query, select and plan around a point in one go
    Explore {
        #[arg(allow_hyphen_values = true)]
        location: Coordinate,

        #[arg(long = "category")]
        categories: Vec<String>,

        #[arg(short, long, default_value = "1000")]
        radius: u32,

        #[arg(long, default_value = "5")]
        max_stops: usize,

        #[arg(long)]
        per_category: Option<u32>,

        #[arg(short, long, default_value = "walking")]
        transport: TransportMode,
    },

    /// Agent tool catalog
    Tools {
        #[command(subcommand)]
        command: ToolCommands,
    },

    /// Check that the API answers
    Health,
}

#[derive(Subcommand)]
enum ToolCommands {
    /// Print tool definitions with their input schemas
    List,

    /// Invoke a tool with JSON arguments
    ///
    /// Example: camino-cli tools call query_locations '{"query": "pizza"}'
    Call { name: String, arguments: String },

    /// Print the hosted tool server endpoint (key redacted)
    Endpoint,

    /// Print a connection entry for agent frameworks (includes the key)
    Connection {
        #[arg(long, default_value = "camino")]
        name: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// A coordinate when the text parses as one, otherwise an address
fn parse_waypoint(text: &str) -> Waypoint {
    text.parse::<Coordinate>()
        .map_or_else(|_| Waypoint::address(text.trim()), Waypoint::at)
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    if let Some(key) = &cli.api_key {
        config.camino.api_key = Some(key.clone().into());
        config.tool_server.api_key = Some(key.clone().into());
    }
    if let Some(base_url) = &cli.base_url {
        config.camino.base_url.clone_from(base_url);
    }

    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }
    init_tracing(&config.telemetry)?;
    debug!(?config, "Configuration loaded");

    let Cli { command, .. } = cli;

    match command {
        Commands::Tools {
            command: ToolCommands::Endpoint,
        } => {
            println!("{}", config.tool_server.redacted_endpoint());
            Ok(())
        },
        Commands::Tools {
            command: ToolCommands::Connection { name },
        } => print_json(&config.tool_server.connection_entry(&name)?),
        command => {
            config.validate()?;
            HttpCaminoClient::scoped(config.camino.clone(), |client| async move {
                run(command, client, &config).await
            })
            .await
        },
    }
}

#[allow(clippy::too_many_lines)]
async fn run(
    command: Commands,
    client: Arc<HttpCaminoClient>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Search { query, limit } => {
            let mut request = SearchRequest::new(query);
            if let Some(limit) = limit {
                request = request.with_limit(limit);
            }
            print_json(&client.search(request).await?)
        },

        Commands::Query {
            query,
            near,
            radius,
            limit,
            offset,
            answer,
            no_rank,
            advanced,
        } => {
            let mut request = QueryRequest::new(query)
                .with_answer(answer)
                .with_rank(!no_rank);
            if let Some(anchor) = near {
                request = request.near(anchor);
            }
            if let Some(radius) = radius {
                request = request.with_radius(radius);
            }
            if let Some(limit) = limit {
                request = request.with_limit(limit);
            }
            if let Some(offset) = offset {
                request = request.with_offset(offset);
            }
            if advanced {
                request = request.with_mode(QueryMode::Advanced);
            }
            print_json(&client.query(request).await?)
        },

        Commands::Relationship { start, end } => {
            print_json(&client.relationship(RelationshipRequest::new(start, end)).await?)
        },

        Commands::Context {
            location,
            radius,
            categories,
            context,
        } => {
            let radius: SearchRadius = radius
                .parse::<u32>()
                .map_or_else(|_| radius.as_str().into(), Into::into);
            let mut request = ContextRequest::new(location, radius).with_categories(categories);
            if let Some(context) = context {
                request = request.with_context(context);
            }
            print_json(&client.context(request).await?)
        },

        Commands::Journey {
            waypoints,
            transport,
            time_budget,
            no_optimize,
        } => {
            let mut constraints = JourneyConstraints::new(transport);
            if let Some(budget) = time_budget {
                constraints = constraints.with_time_budget(budget);
            }
            let waypoints = waypoints.iter().map(|w| parse_waypoint(w)).collect();
            let request = JourneyRequest::new(waypoints, constraints).with_optimize(!no_optimize);
            print_json(&client.journey(request).await?)
        },

        Commands::Route {
            start,
            end,
            mode,
            instructions,
            geometry,
        } => {
            let request = RouteRequest::new(start, end)
                .with_mode(RouteMode::from(mode))
                .with_instructions(instructions)
                .with_geometry(geometry);
            print_json(&client.route(request).await?)
        },

        Commands::Explore {
            location,
            categories,
            radius,
            max_stops,
            per_category,
            transport,
        } => {
            let explorer = AreaExplorer::with_settings(client, config.workflow.clone())?;
            let request = ExploreRequest {
                categories,
                radius,
                max_pois_per_category: per_category,
                max_stops,
                transport,
                ..ExploreRequest::new(location)
            };
            let result = explorer.explore_and_plan(request).await;
            print_json(&result)?;
            if !result.success {
                anyhow::bail!(
                    "Exploration failed: {}",
                    result.error_message.as_deref().unwrap_or("unknown error")
                );
            }
            Ok(())
        },

        Commands::Tools { command } => {
            let catalog = ToolCatalog::for_server(client, &config.tool_server)?;
            match command {
                ToolCommands::List => print_json(&catalog.definitions()),
                ToolCommands::Call { name, arguments } => {
                    let arguments = serde_json::from_str(&arguments)
                        .with_context(|| format!("Arguments for {name} are not valid JSON"))?;
                    print_json(&catalog.call(&name, arguments).await?)
                },
                ToolCommands::Endpoint | ToolCommands::Connection { .. } => Ok(()),
            }
        },

        Commands::Health => {
            if client.is_healthy().await {
                println!("✅ Healthy");
                Ok(())
            } else {
                anyhow::bail!("❌ Unhealthy: {}", client.config().normalized_base_url())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_filter_verbosity_zero_keeps_config() {
        assert_eq!(log_filter_from_verbosity(0), None);
    }

    #[test]
    fn log_filter_verbosity_levels() {
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
        assert_eq!(log_filter_from_verbosity(3), Some("trace"));
        assert_eq!(log_filter_from_verbosity(10), Some("trace"));
    }

    #[test]
    fn waypoint_from_coordinate_text() {
        let waypoint = parse_waypoint("40.7589, -73.9851");
        assert!(waypoint.coordinate().is_some());
    }

    #[test]
    fn waypoint_from_address_text() {
        let waypoint = parse_waypoint(" Times Square, New York ");
        assert!(waypoint.coordinate().is_none());
    }

    #[test]
    fn parses_query_with_negative_anchor() {
        let cli = Cli::try_parse_from([
            "camino-cli",
            "query",
            "coffee",
            "--near",
            "40.7831,-73.9712",
            "--radius",
            "1000",
        ])
        .unwrap();
        let Commands::Query { near, radius, .. } = cli.command else {
            panic!("expected query");
        };
        assert_eq!(near, Some(Coordinate::new(40.7831, -73.9712).unwrap()));
        assert_eq!(radius, Some(1000));
    }

    #[test]
    fn journey_requires_two_waypoints() {
        assert!(Cli::try_parse_from(["camino-cli", "journey", "40.7,-74.0"]).is_err());
        assert!(
            Cli::try_parse_from(["camino-cli", "journey", "40.7,-74.0", "Central Park"]).is_ok()
        );
    }

    #[test]
    fn rejects_unknown_transport() {
        assert!(
            Cli::try_parse_from(["camino-cli", "route", "1,2", "3,4", "--mode", "teleport"])
                .is_err()
        );
    }
}
