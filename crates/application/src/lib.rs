//! Application layer - Workflows and agent tooling on top of the Camino client
//!
//! [`workflow`] chains the raw endpoints into multi-step location workflows;
//! [`tools`] exposes the endpoints to agent frameworks.

pub mod tools;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use tools::{CaminoTool, RemoteToolServer, ToolCatalog, ToolDefinition, ToolError, ToolTransport};
pub use workflow::*;
