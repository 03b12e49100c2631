// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorized Request Gateway
//!
//! Every call to the exchange backend goes through [`Gateway::request`]:
//!
//! - the bearer token is read from the [`SessionStore`] at dispatch time, so a
//!   login or logout between two calls is always honoured
//! - `Content-Type: application/json` is the default; caller headers replace
//!   defaults key by key
//! - the HTTP client keeps a cookie jar, whether or not a token is present
//! - responses are normalised by [`interpret_response`]
//!
//! The gateway never mutates the session. It does not retry, coalesce or
//! time out calls; callers needing a bound wrap the future themselves.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::session::SessionStore;

/// Options for a single gateway call. Defaults to a bodiless GET.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Extra headers; each replaces any default with the same name.
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// HTTP gateway bound to one backend and one session store.
#[derive(Clone)]
pub struct Gateway {
    base_url: String,
    http: Client,
    session: Arc<SessionStore>,
}

impl Gateway {
    /// Build a gateway with a cookie-keeping HTTP client.
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(base_url, http, session))
    }

    /// Build a gateway around an existing client.
    pub fn with_client(
        base_url: impl Into<String>,
        http: Client,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Absolute URL for a backend path (paths are appended verbatim).
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Perform one call and normalise the outcome.
    ///
    /// `Ok(None)` is the null payload: an empty, non-JSON or literal `null`
    /// body on a 2xx status.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<Value>, ApiError> {
        let token = self.session.current_token();
        let headers = build_headers(token.as_deref(), &options.headers)?;

        debug!(
            method = %options.method,
            path = %path,
            authorized = token.is_some(),
            "Dispatching API request"
        );

        let mut builder = self
            .http
            .request(options.method.clone(), self.url_for(path))
            .headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|e| {
            warn!(method = %options.method, path = %path, error = %e, "API request failed to send");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = match response.bytes().await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(path = %path, status = %status, error = %e, "Failed to read response body");
                None
            }
        };

        let result = interpret_response(status, body.as_deref());
        if let Err(e) = &result {
            debug!(method = %options.method, path = %path, status = %status, error = %e, "API request rejected");
        }
        result
    }

    /// GET `path` and decode the payload as `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let payload = self.request(path, RequestOptions::get()).await?;
        decode_payload(path, payload)
    }

    /// Send `body` as JSON with `method` and decode the payload as `T`.
    pub async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Body(e.to_string()))?;
        let payload = self
            .request(path, RequestOptions::new(method).with_json(body))
            .await?;
        decode_payload(path, payload)
    }
}

/// Default headers plus caller overrides.
pub fn build_headers(
    token: Option<&str>,
    extra: &[(String, String)],
) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::InvalidHeader(AUTHORIZATION.to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in extra {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.clone()))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// Map status + body to the gateway's result.
///
/// | body parses | status | result |
/// |---|---|---|
/// | no  | 2xx   | `Ok(None)` |
/// | no  | other | generic failure |
/// | yes | other | failure with the body's `error` string, else generic |
/// | yes | 2xx   | `Ok(Some(payload))`, `null` collapses to `Ok(None)` |
///
/// The asymmetry between the first two rows is kept for compatibility
/// with existing backends that answer 2xx with empty bodies.
pub fn interpret_response(status: StatusCode, body: Option<&[u8]>) -> Result<Option<Value>, ApiError> {
    let parsed = body.and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok());

    match (parsed, status.is_success()) {
        (None, true) => Ok(None),
        (None, false) => Err(ApiError::generic(status)),
        (Some(payload), false) => Err(ApiError::from_error_body(status, &payload)),
        (Some(Value::Null), true) => Ok(None),
        (Some(payload), true) => Ok(Some(payload)),
    }
}

/// Decode a payload into the endpoint's declared type.
///
/// The null payload is offered as JSON `null`, so `Option<T>` targets accept
/// it and anything else fails the schema check.
pub fn decode_payload<T: DeserializeOwned>(
    context: &str,
    payload: Option<Value>,
) -> Result<T, ApiError> {
    serde_json::from_value(payload.unwrap_or(Value::Null))
        .map_err(|e| ApiError::Decode(format!("{context}: {e}")))
}
