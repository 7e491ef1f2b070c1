// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error taxonomy for the admin guard.
//!
//! Every variant is a recoverable verdict. The `Display` text is what the
//! client sees; `code()` is the stable machine-readable identifier.

use crate::patterns::ThreatKind;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Guard and validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("Rate limit exceeded")]
    RateLimitExceeded { retry_after: Duration },

    #[error("Invalid origin")]
    InvalidOrigin,

    #[error("Not found")]
    IpNotAllowed { ip: String },

    #[error("Invalid content type")]
    InvalidContentType { actual: Option<String> },

    #[error("Missing required request headers")]
    MissingRequestHeader { header: &'static str },

    #[error("{0}")]
    MaliciousContent(ThreatKind),

    #[error("Content contains disallowed HTML tags")]
    DisallowedHtmlTag { tag: String },

    #[error("Invalid JSON data")]
    InvalidJson,

    #[error("Invalid JSON format")]
    MalformedJson,

    #[error("Error processing JSON data")]
    JsonProcessing,

    #[error("Invalid file type. Allowed types: JPEG, PNG, GIF, PDF")]
    InvalidFileType { actual: String },

    #[error("File size exceeds {limit} limit")]
    FileTooLarge { limit: String },

    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("Invalid protocol. Only HTTP and HTTPS are allowed")]
    InvalidProtocol { scheme: String },

    #[error("Internal server error")]
    Internal(String),
}

impl GuardError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidOrigin => StatusCode::FORBIDDEN,
            Self::IpNotAllowed { .. } => StatusCode::NOT_FOUND,
            Self::InvalidFileType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidContentType { .. }
            | Self::MissingRequestHeader { .. }
            | Self::MaliciousContent(_)
            | Self::DisallowedHtmlTag { .. }
            | Self::InvalidJson
            | Self::MalformedJson
            | Self::JsonProcessing
            | Self::InvalidUrl
            | Self::InvalidProtocol { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable error code for clients and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimitExceeded { .. } => "RATE_LIMITED",
            Self::InvalidOrigin => "INVALID_ORIGIN",
            Self::IpNotAllowed { .. } => "NOT_FOUND",
            Self::InvalidContentType { .. } => "INVALID_CONTENT_TYPE",
            Self::MissingRequestHeader { .. } => "MISSING_REQUIRED_HEADER",
            Self::MaliciousContent(kind) => kind.code(),
            Self::DisallowedHtmlTag { .. } => "DISALLOWED_HTML_TAG",
            Self::InvalidJson | Self::MalformedJson => "INVALID_JSON",
            Self::JsonProcessing => "JSON_PROCESSING_ERROR",
            Self::InvalidFileType { .. } => "INVALID_FILE_TYPE",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::InvalidUrl | Self::InvalidProtocol { .. } => "INVALID_URL",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Seconds until a rate-limited client may retry, rounded up.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimitExceeded { retry_after } => Some(ceil_secs(*retry_after)),
            _ => None,
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl From<&GuardError> for ErrorResponse {
    fn from(err: &GuardError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code(),
            retry_after_secs: err.retry_after_secs(),
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from(&self);
        match body.retry_after_secs {
            Some(secs) => (
                status,
                [(header::RETRY_AFTER, secs.to_string())],
                Json(body),
            )
                .into_response(),
            None => (status, Json(body)).into_response(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GuardError>;
