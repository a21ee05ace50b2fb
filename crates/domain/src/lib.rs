//! Domain layer for the Camino client
//!
//! Value objects shared by the HTTP client, the workflow helpers and the CLI.
//! This layer performs no I/O.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
