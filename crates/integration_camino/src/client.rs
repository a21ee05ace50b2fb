//! Async Camino client

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::{debug, instrument, warn};
use validator::Validate;

use crate::config::CaminoConfig;
use crate::error::CaminoError;
use crate::models::{
    ContextRequest, ContextResponse, JourneyRequest, JourneyResponse, PayloadMode, QueryRequest,
    QueryResponse, RelationshipRequest, RelationshipResponse, RouteRequest, RouteResponse,
    SearchRequest, SearchResponse, to_payload,
};
use crate::transport::HttpTransport;

/// Location-intelligence operations offered by the Camino API
#[async_trait]
pub trait CaminoClient: Send + Sync {
    /// Free-text place search
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, CaminoError>;

    /// Natural-language place query, optionally anchored to a point
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, CaminoError>;

    /// Distance, direction and travel time between two points
    async fn relationship(
        &self,
        request: RelationshipRequest,
    ) -> Result<RelationshipResponse, CaminoError>;

    /// Describe the area around a point
    async fn context(&self, request: ContextRequest) -> Result<ContextResponse, CaminoError>;

    /// Plan a multi-waypoint journey
    async fn journey(&self, request: JourneyRequest) -> Result<JourneyResponse, CaminoError>;

    /// Point-to-point route
    async fn route(&self, request: RouteRequest) -> Result<RouteResponse, CaminoError>;

    /// Check if the API is reachable with the configured key
    async fn is_healthy(&self) -> bool;
}

/// [`CaminoClient`] backed by a pooled `reqwest` client
///
/// Cheap to share behind an `Arc`; concurrent calls reuse the pool.
#[derive(Debug)]
pub struct HttpCaminoClient {
    transport: HttpTransport,
    config: CaminoConfig,
}

impl HttpCaminoClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns a validation error if the configuration is invalid, or an
    /// API error if the HTTP client cannot be initialized.
    pub fn new(config: CaminoConfig) -> Result<Self, CaminoError> {
        let transport = HttpTransport::new(&config)?;
        debug!(base_url = %config.normalized_base_url(), "Camino client created");
        Ok(Self { transport, config })
    }

    pub const fn config(&self) -> &CaminoConfig {
        &self.config
    }

    /// Headers sent with every request (the API key value is marked sensitive)
    pub const fn headers(&self) -> &HeaderMap {
        self.transport.headers()
    }

    /// Run `body` with a fresh client and release it afterwards, whether the
    /// body succeeded or not
    ///
    /// The body gets an `Arc` so it can hand the client to workflow helpers
    /// and tool catalogs. Clones that outlive the body keep the connection
    /// pool alive until the last one is dropped; the scope only releases its
    /// own reference and logs when others remain.
    pub async fn scoped<F, Fut, T, E>(config: CaminoConfig, body: F) -> Result<T, E>
    where
        F: FnOnce(Arc<Self>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CaminoError>,
    {
        let client = Arc::new(Self::new(config)?);
        let result = body(Arc::clone(&client)).await;
        match Arc::try_unwrap(client) {
            Ok(client) => client.close(),
            Err(shared) => warn!(
                remaining = Arc::strong_count(&shared) - 1,
                "Scoped Camino client still referenced after the body finished"
            ),
        }
        result
    }

    /// Free-text search from a bare query string
    pub async fn search_str(&self, query: &str) -> Result<SearchResponse, CaminoError> {
        CaminoClient::search(self, query.into()).await
    }

    /// Natural-language query from a bare query string, with request defaults
    pub async fn query_str(&self, query: &str) -> Result<QueryResponse, CaminoError> {
        CaminoClient::query(self, query.into()).await
    }

    /// Release pooled connections
    pub fn close(self) {
        debug!("Camino client closed");
    }

    fn checked<R: Validate>(request: &R) -> Result<(), CaminoError> {
        request.validate().map_err(CaminoError::from)
    }
}

#[async_trait]
impl CaminoClient for HttpCaminoClient {
    #[instrument(skip(self, request), fields(query = %request.query))]
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, CaminoError> {
        Self::checked(&request)?;
        self.transport
            .get("/search", request.to_query_params())
            .await
    }

    #[instrument(skip(self, request), fields(query = %request.query, mode = %request.mode))]
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, CaminoError> {
        Self::checked(&request)?;
        let response: QueryResponse = self
            .transport
            .get("/query", request.to_query_params())
            .await?;
        debug!(results = response.results.len(), "Query complete");
        Ok(response)
    }

    #[instrument(skip(self, request), fields(start = %request.start, end = %request.end))]
    async fn relationship(
        &self,
        request: RelationshipRequest,
    ) -> Result<RelationshipResponse, CaminoError> {
        Self::checked(&request)?;
        let body = to_payload(&request, PayloadMode::ExcludeAbsent)?;
        self.transport.post("/relationship", body).await
    }

    #[instrument(skip(self, request), fields(location = %request.location, radius = %request.radius))]
    async fn context(&self, request: ContextRequest) -> Result<ContextResponse, CaminoError> {
        Self::checked(&request)?;
        let body = to_payload(&request, PayloadMode::ExcludeAbsent)?;
        self.transport.post("/context", body).await
    }

    #[instrument(skip(self, request), fields(waypoints = request.waypoints.len()))]
    async fn journey(&self, request: JourneyRequest) -> Result<JourneyResponse, CaminoError> {
        Self::checked(&request)?;
        let body = to_payload(&request, PayloadMode::ExcludeAbsent)?;
        self.transport.post("/journey", body).await
    }

    #[instrument(skip(self, request), fields(mode = %request.mode))]
    async fn route(&self, request: RouteRequest) -> Result<RouteResponse, CaminoError> {
        Self::checked(&request)?;
        let body = to_payload(&request, PayloadMode::ExcludeAbsent)?;
        self.transport.post("/route", body).await
    }

    async fn is_healthy(&self) -> bool {
        match self.search(SearchRequest::new("health").with_limit(1)).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Camino health check failed");
                false
            },
        }
    }
}
