//! Authenticated gateway for every outbound call to the marketplace API.
//!
//! ARCHITECTURE
//! ============
//! Resource modules (`auth`, `listings`, `catalog`) build a path plus
//! [`RequestOptions`] and hand them here. The gateway owns transport and
//! auth concerns: default JSON content type, bearer token lookup through the
//! shared [`SessionHandle`], and normalization of error and empty-body
//! responses.
//!
//! ERROR HANDLING
//! ==============
//! Every call is fire-once. Non-success statuses become
//! [`ApiError::RequestFailed`] carrying the body text; a declared-JSON body
//! that fails to parse is [`ApiError::MalformedResponse`]. An empty or
//! non-JSON success body is `Ok(None)`, not an error. Nothing is retried.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::state::auth::SessionHandle;

const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("API error {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The API declared a JSON body that does not parse (or lacks an expected body).
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request never produced a response (connect, timeout, client build).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The request could not be encoded (bad header value, unserializable body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

// =============================================================================
// REQUEST OPTIONS
// =============================================================================

#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Pre-serialized JSON bytes.
    Json(Vec<u8>),
    /// Multipart form. Its own boundary content type replaces the JSON default.
    Multipart(reqwest::multipart::Form),
}

/// Per-call request description: method, extra headers, query pairs, body.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn post() -> Self {
        Self { method: Method::POST, ..Self::default() }
    }

    #[must_use]
    pub fn put() -> Self {
        Self { method: Method::PUT, ..Self::default() }
    }

    #[must_use]
    pub fn delete() -> Self {
        Self { method: Method::DELETE, ..Self::default() }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = RequestBody::Json(bytes);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Add a caller header. Caller headers override the gateway defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the name or value is not a valid header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let value = HeaderValue::from_str(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    fn is_multipart(&self) -> bool {
        matches!(self.body, RequestBody::Multipart(_))
    }
}

// =============================================================================
// GATEWAY
// =============================================================================

/// Single chokepoint for API calls. Cheap to clone; clones share the
/// connection pool and the session handle.
#[derive(Clone, Debug)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl Gateway {
    /// Build a gateway for `config.api_url` that reads tokens from `session`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionHandle) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { http, base_url: config.api_url.trim_end_matches('/').to_owned(), session })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Send one request and return the parsed JSON body, if any.
    ///
    /// When `include_auth` is set and a session is active the bearer token is
    /// attached; with no active session the request goes out without it.
    ///
    /// # Errors
    ///
    /// See the module docs: `RequestFailed`, `MalformedResponse`, `Transport`,
    /// `InvalidRequest`.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
        include_auth: bool,
    ) -> Result<Option<Value>, ApiError> {
        let token = if include_auth { self.session.token() } else { None };
        let headers = build_headers(&options, token.as_deref())?;
        let RequestOptions { method, query, body, .. } = options;

        tracing::debug!(%method, path, auth = token.is_some(), "api request");

        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method.clone(), url).headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains(JSON_CONTENT_TYPE));
        let text = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(%method, path, status = status.as_u16(), "api request failed");
            return Err(ApiError::RequestFailed { status: status.as_u16(), body: text });
        }

        parse_body(is_json, &text)
    }

    /// [`Gateway::request`] with the body deserialized into `T`.
    ///
    /// # Errors
    ///
    /// As [`Gateway::request`]; a body that is valid JSON of the wrong shape
    /// is also [`ApiError::MalformedResponse`].
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
        include_auth: bool,
    ) -> Result<Option<T>, ApiError> {
        let Some(value) = self.request(path, options, include_auth).await? else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

/// Require a body for endpoints documented to always return one.
///
/// # Errors
///
/// Returns [`ApiError::MalformedResponse`] when the response had no JSON body.
pub fn expect_body<T>(path: &str, body: Option<T>) -> Result<T, ApiError> {
    body.ok_or_else(|| ApiError::MalformedResponse(format!("expected a JSON body from {path}")))
}

fn build_headers(options: &RequestOptions, token: Option<&str>) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    if !options.is_multipart() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    }
    if let Some(token) = token {
        let value =
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        headers.insert(AUTHORIZATION, value);
    }
    for (name, value) in &options.headers {
        headers.insert(name.clone(), value.clone());
    }
    Ok(headers)
}

fn parse_body(is_json: bool, text: &str) -> Result<Option<Value>, ApiError> {
    if !is_json || text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| ApiError::MalformedResponse(format!("invalid JSON response: {e}")))
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
