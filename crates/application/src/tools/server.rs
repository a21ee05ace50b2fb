//! Hosted tool server connection settings
//!
//! Agent frameworks reach the Camino tools through a hosted server. The API
//! key travels as the `caminoApiKey` query parameter.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use super::ToolError;

/// Query parameter carrying the API key
pub const API_KEY_PARAM: &str = "caminoApiKey";

/// Wire transport spoken by the tool server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolTransport {
    Sse,
    #[default]
    StreamableHttp,
}

impl ToolTransport {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sse => "sse",
            Self::StreamableHttp => "streamable_http",
        }
    }
}

impl fmt::Display for ToolTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for the hosted tool server
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteToolServer {
    #[serde(default = "default_url")]
    pub url: String,

    /// Camino API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub transport: ToolTransport,

    /// Only expose these tools (all when unset)
    #[serde(default)]
    pub tool_filter: Option<Vec<String>>,
}

fn default_url() -> String {
    "https://mcp.getcamino.ai/mcp".to_string()
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "User-Agent".to_string(),
            format!("camino-ai-rust/{}", env!("CARGO_PKG_VERSION")),
        ),
        (
            "Accept".to_string(),
            "application/json, text/event-stream".to_string(),
        ),
    ])
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for RemoteToolServer {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            headers: default_headers(),
            timeout_secs: default_timeout_secs(),
            transport: ToolTransport::default(),
            tool_filter: None,
        }
    }
}

impl fmt::Debug for RemoteToolServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteToolServer")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("headers", &self.headers)
            .field("timeout_secs", &self.timeout_secs)
            .field("transport", &self.transport)
            .field("tool_filter", &self.tool_filter)
            .finish()
    }
}

impl RemoteToolServer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub const fn with_transport(mut self, transport: ToolTransport) -> Self {
        self.transport = transport;
        self
    }

    #[must_use]
    pub fn with_tool_filter<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_filter = Some(tools.into_iter().map(Into::into).collect());
        self
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Server URL with the API key appended as a query parameter
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is missing or the URL does
    /// not parse.
    pub fn endpoint_url(&self) -> Result<Url, ToolError> {
        let key = self
            .api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ToolError::Configuration("API key is required".to_string()))?;

        let mut url = Url::parse(&self.url)
            .map_err(|e| ToolError::Configuration(format!("invalid url {}: {e}", self.url)))?;
        url.query_pairs_mut().append_pair(API_KEY_PARAM, key);
        Ok(url)
    }

    /// Endpoint URL safe for logs
    pub fn redacted_endpoint(&self) -> String {
        format!("{}?{API_KEY_PARAM}=[REDACTED]", self.url)
    }

    /// Connection entry in the shape multi-server agent clients expect:
    /// `{"<name>": {"url", "transport", "headers", "timeout"}}`
    ///
    /// # Errors
    ///
    /// Same as [`endpoint_url`](Self::endpoint_url).
    pub fn connection_entry(&self, name: &str) -> Result<Value, ToolError> {
        let mut entry = json!({
            "url": self.endpoint_url()?.as_str(),
            "transport": self.transport.as_str(),
            "headers": self.headers,
            "timeout": self.timeout_secs,
        });
        if let Some(filter) = &self.tool_filter {
            entry["tool_filter"] = json!(filter);
        }
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(name.to_string(), entry);
        Ok(Value::Object(wrapper))
    }
}
