// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use reqwest::StatusCode;
use serde::Deserialize;

/// Message used whenever the backend gives no usable `error` field.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Failure of a single gateway call or endpoint wrapper.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// The request never produced a response (DNS, refused, reset, ...).
    #[error("network request failed: {0}")]
    Transport(String),

    /// The payload did not match the endpoint's expected shape.
    #[error("unexpected response payload: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("invalid request body: {0}")]
    Body(String),

    /// A caller-supplied header could not be encoded.
    #[error("invalid request header: {0}")]
    InvalidHeader(String),

    /// A form failed client-side checks; nothing was sent.
    #[error("{0}")]
    Validation(String),
}

/// Conventional backend error body: `{"error": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
}

impl ApiError {
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn generic(status: StatusCode) -> Self {
        Self::status(status, GENERIC_ERROR_MESSAGE)
    }

    /// Build a status error from an already-parsed failure body.
    pub fn from_error_body(status: StatusCode, body: &serde_json::Value) -> Self {
        let message = serde_json::from_value::<ErrorBody>(body.clone())
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.as_str().map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        Self::status(status, message)
    }

    /// HTTP status, when the backend answered at all.
    pub fn http_status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 or 403. Front ends decide what to do; the gateway never logs out.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.http_status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

impl From<crate::models::ValidationError> for ApiError {
    fn from(e: crate::models::ValidationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}
