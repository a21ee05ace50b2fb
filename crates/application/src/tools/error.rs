//! Tool adapter errors

use integration_camino::CaminoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with this name, or it is filtered out
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments did not match the tool's input schema
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    /// The underlying API call failed
    #[error(transparent)]
    Camino(#[from] CaminoError),

    /// Remote tool server settings are unusable
    #[error("Tool server configuration error: {0}")]
    Configuration(String),
}

impl ToolError {
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Camino(e) => e.is_retryable(),
            _ => false,
        }
    }
}
