//! Camino location-intelligence API client
//!
//! Wraps the hosted Camino API: free-text search, natural-language place
//! queries, spatial relationships, area context, journey planning and
//! point-to-point routing.
//!
//! # Architecture
//!
//! [`CaminoClient`] defines the async interface, implemented by
//! [`HttpCaminoClient`]. [`BlockingCaminoClient`] drives the same client on
//! an owned runtime for synchronous callers. Both share request validation,
//! retry with exponential backoff and the [`CaminoError`] mapping.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_camino::{CaminoClient, CaminoConfig, HttpCaminoClient, QueryRequest};
//! use domain::Coordinate;
//!
//! let client = HttpCaminoClient::new(CaminoConfig::new("your-api-key"))?;
//!
//! let cafes = client.query("coffee shops".into()).await?;
//!
//! let nearby = client
//!     .query(
//!         QueryRequest::new("coffee shops")
//!             .near(Coordinate::new(40.7831, -73.9712)?)
//!             .with_radius(1000),
//!     )
//!     .await?;
//! ```

mod blocking;
mod client;
mod config;
mod error;
pub mod models;
pub mod retry;
mod transport;

pub use blocking::BlockingCaminoClient;
pub use client::{CaminoClient, HttpCaminoClient};
pub use config::CaminoConfig;
pub use error::{CONNECTION_STATUS, CaminoError, ErrorDetails, TIMEOUT_STATUS};
pub use models::*;
pub use transport::{X_API_KEY, X_REQUEST_ID};
