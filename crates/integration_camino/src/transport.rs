//! HTTP plumbing shared by the async and blocking clients
//!
//! Every request carries the API key, JSON content type, user agent and a
//! fresh `X-Request-Id`. Non-success responses are mapped onto
//! [`CaminoError`] and retried according to [`RetryPolicy`].

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::config::CaminoConfig;
use crate::error::{CaminoError, ErrorDetails};
use crate::models::parse_json;
use crate::retry::{RetryPolicy, with_retry};

/// Header carrying the API key
pub const X_API_KEY: &str = "x-api-key";

/// Header carrying the per-request correlation id
pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Debug)]
pub(crate) enum Payload {
    Query(Vec<(&'static str, String)>),
    Json(Value),
}

#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    client: Client,
    headers: HeaderMap,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub(crate) fn new(config: &CaminoConfig) -> Result<Self, CaminoError> {
        config.validate()?;
        let headers = default_headers(config)?;

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers.clone())
            .build()
            .map_err(|e| CaminoError::transport(false, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            headers,
            base_url: config.normalized_base_url().to_string(),
            retry: RetryPolicy::from_config(config),
        })
    }

    pub(crate) const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<T, CaminoError> {
        self.execute(Method::GET, path, &Payload::Query(params)).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<T, CaminoError> {
        self.execute(Method::POST, path, &Payload::Json(body)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: &Payload,
    ) -> Result<T, CaminoError> {
        let url = format!("{}{}", self.base_url, path);

        let outcome = with_retry(&self.retry, || self.send_once(&method, &url, payload)).await;
        let body = outcome.into_result()?;
        parse_json(&body)
    }

    /// A single attempt; returns the raw success body
    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        payload: &Payload,
    ) -> Result<String, CaminoError> {
        let request_id = Uuid::new_v4();
        debug!(%method, url, %request_id, "Sending Camino request");

        let builder = self
            .client
            .request(method.clone(), url)
            .header(X_REQUEST_ID, request_id.to_string());
        let builder = match payload {
            Payload::Query(params) => builder.query(params),
            Payload::Json(body) => builder.json(body),
        };

        let response = builder.send().await.map_err(|e| map_transport_error(&e))?;
        let status = response.status();

        if status.is_success() {
            return response.text().await.map_err(|e| map_transport_error(&e));
        }

        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), %request_id, "Camino request failed");

        Err(error_from_response(status, retry_after, &body))
    }
}

fn default_headers(config: &CaminoConfig) -> Result<HeaderMap, CaminoError> {
    let invalid = |name: &str| CaminoError::validation(format!("{name} contains invalid header characters"));

    let mut api_key = HeaderValue::from_str(config.api_key().unwrap_or_default())
        .map_err(|_| invalid("API key"))?;
    api_key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(X_API_KEY), api_key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).map_err(|_| invalid("User agent"))?,
    );
    Ok(headers)
}

fn map_transport_error(err: &reqwest::Error) -> CaminoError {
    if err.is_timeout() {
        CaminoError::transport(true, format!("Request timed out: {err}"))
    } else {
        CaminoError::transport(false, format!("Request failed: {err}"))
    }
}

/// `Retry-After` in whole seconds; HTTP-date and garbage values yield `None`
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Map a non-success response onto the error taxonomy
pub(crate) fn error_from_response(
    status: StatusCode,
    retry_after: Option<u64>,
    body: &str,
) -> CaminoError {
    let response = if body.trim().is_empty() {
        None
    } else {
        Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
    };

    let message = response
        .as_ref()
        .and_then(server_message)
        .unwrap_or_else(|| format!("HTTP {status}"));

    let details = response
        .as_ref()
        .and_then(|r| r.get("details"))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(ErrorDetails::new);

    let status_code = status.as_u16();
    match status {
        StatusCode::UNAUTHORIZED => CaminoError::Authentication {
            message,
            status_code,
            response,
            details,
        },
        StatusCode::TOO_MANY_REQUESTS => CaminoError::RateLimit {
            message,
            status_code,
            retry_after,
            response,
            details,
        },
        _ => CaminoError::Api {
            message,
            status_code,
            response,
            details,
        },
    }
}

fn server_message(response: &Value) -> Option<String> {
    match response {
        Value::Object(map) => ["message", "error", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(ToString::to_string),
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}
