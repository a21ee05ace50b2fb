//! Blocking wrapper around [`HttpCaminoClient`]
//!
//! Owns a current-thread Tokio runtime and drives the async client on it, so
//! validation, retries and error mapping are identical. Must not be used
//! from inside an async context.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::client::{CaminoClient, HttpCaminoClient};
use crate::config::CaminoConfig;
use crate::error::CaminoError;
use crate::models::{
    ContextRequest, ContextResponse, JourneyRequest, JourneyResponse, QueryRequest, QueryResponse,
    RelationshipRequest, RelationshipResponse, RouteRequest, RouteResponse, SearchRequest,
    SearchResponse,
};

/// Synchronous Camino client
#[derive(Debug)]
pub struct BlockingCaminoClient {
    inner: Arc<HttpCaminoClient>,
    runtime: Runtime,
}

impl BlockingCaminoClient {
    /// Create a new blocking client
    ///
    /// # Errors
    ///
    /// Same as [`HttpCaminoClient::new`]; additionally fails if the runtime
    /// cannot be started.
    pub fn new(config: CaminoConfig) -> Result<Self, CaminoError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CaminoError::transport(false, format!("Failed to start runtime: {e}")))?;

        let inner = {
            let _guard = runtime.enter();
            HttpCaminoClient::new(config)?
        };

        Ok(Self {
            inner: Arc::new(inner),
            runtime,
        })
    }

    /// Run `body` with a fresh client and release it afterwards
    pub fn scoped<F, T, E>(config: CaminoConfig, body: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<CaminoError>,
    {
        let client = Self::new(config)?;
        let result = body(&client);
        client.close();
        result
    }

    /// Release pooled connections and shut the runtime down
    pub fn close(self) {
        drop(self.inner);
        self.runtime.shutdown_background();
        debug!("Blocking Camino client closed");
    }

    /// The async client this wrapper drives
    pub fn as_async(&self) -> Arc<HttpCaminoClient> {
        Arc::clone(&self.inner)
    }

    pub fn search(&self, request: impl Into<SearchRequest>) -> Result<SearchResponse, CaminoError> {
        self.runtime.block_on(self.inner.search(request.into()))
    }

    pub fn query(&self, request: impl Into<QueryRequest>) -> Result<QueryResponse, CaminoError> {
        self.runtime.block_on(self.inner.query(request.into()))
    }

    pub fn relationship(
        &self,
        request: impl Into<RelationshipRequest>,
    ) -> Result<RelationshipResponse, CaminoError> {
        self.runtime.block_on(self.inner.relationship(request.into()))
    }

    pub fn context(
        &self,
        request: impl Into<ContextRequest>,
    ) -> Result<ContextResponse, CaminoError> {
        self.runtime.block_on(self.inner.context(request.into()))
    }

    pub fn journey(
        &self,
        request: impl Into<JourneyRequest>,
    ) -> Result<JourneyResponse, CaminoError> {
        self.runtime.block_on(self.inner.journey(request.into()))
    }

    pub fn route(&self, request: impl Into<RouteRequest>) -> Result<RouteResponse, CaminoError> {
        self.runtime.block_on(self.inner.route(request.into()))
    }

    pub fn is_healthy(&self) -> bool {
        self.runtime.block_on(self.inner.is_healthy())
    }
}
