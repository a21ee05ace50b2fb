//! Tool-calling adapter for agent frameworks
//!
//! [`ToolCatalog`] exposes the endpoint methods as named tools with JSON
//! schemas; [`RemoteToolServer`] describes the hosted server agents connect
//! to instead.

mod catalog;
mod error;
mod server;

pub use catalog::{CaminoTool, ToolCatalog, ToolDefinition};
pub use error::ToolError;
pub use server::{API_KEY_PARAM, RemoteToolServer, ToolTransport};
