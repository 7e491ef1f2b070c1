// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the admin guard service.
//!
//! The admin tree sits behind [`guard_admin_api`]; health, metrics and the
//! external `/check` endpoint are unguarded.

use crate::config::Config;
use crate::content::{validate_url, ContentValidator};
use crate::error::GuardError;
use crate::guard::{guard_admin_api, RequestFacts, RequestGuard};
use crate::headers::cors_layer;
use crate::metrics::GuardMetrics;
use crate::sanitizer::{safe_json_parse, sanitize_input};
use crate::status::StatusTone;
use crate::token::{generate_secure_token, DEFAULT_TOKEN_BYTES};
use crate::upload::validate_file_upload;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::IpAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub guard: RequestGuard,
    pub content: ContentValidator,
    pub metrics: GuardMetrics,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, prometheus::Error> {
        Ok(Self {
            guard: RequestGuard::new(&config),
            content: ContentValidator::new(config.content.allowed_tags.clone()),
            metrics: GuardMetrics::new()?,
            config,
        })
    }

    fn reject(&self, err: GuardError) -> GuardError {
        info!(code = err.code(), error = %err, "Payload rejected");
        self.metrics.record_rejected(err.code());
        err
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Guard check request (for external validation).
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub ip: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub requested_with: Option<String>,
}

/// Guard check response.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

impl CheckResponse {
    fn denied(err: &GuardError) -> Self {
        Self {
            allowed: false,
            reason: Some(err.to_string()),
            code: Some(err.code()),
            retry_after_secs: err.retry_after_secs(),
            remaining: None,
        }
    }
}

/// Blog post submission.
#[derive(Debug, Deserialize)]
pub struct BlogPostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct BlogPostResponse {
    pub status: &'static str,
    pub title: String,
    pub content: String,
}

/// Declared upload metadata.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct StatusToneResponse {
    pub status: String,
    pub tone: StatusTone,
    pub classes: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/", get(admin_index).post(admin_submit))
        .route("/blog", post(submit_blog_post))
        .route("/uploads/validate", post(validate_upload))
        .route("/links/validate", post(validate_link))
        .route("/status/:status", get(status_tone))
        .route("/token", get(issue_token))
        .layer(from_fn_with_state(state.clone(), guard_admin_api))
        .layer(cors_layer(&state.config.cors));

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/check", post(check))
        .nest("/api/admin", admin);

    let metrics = &state.config.metrics;
    if metrics.enabled {
        if metrics.path.starts_with('/') {
            app = app.route(&metrics.path, get(metrics_endpoint));
        } else {
            warn!(path = %metrics.path, "Metrics path must start with '/', endpoint disabled");
        }
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "admin-guard",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

/// Run the guard pipeline for a request described in the body.
///
/// Called by a reverse proxy before forwarding to the admin backend.
/// Denials are reported with 200 so the proxy can read the body.
pub async fn check(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckRequest>,
) -> (StatusCode, Json<CheckResponse>) {
    debug!(
        ip = %req.ip,
        origin = ?req.origin,
        host = ?req.host,
        method = ?req.method,
        "Processing guard check"
    );

    if req.ip.parse::<IpAddr>().is_err() {
        warn!(ip = %req.ip, "Invalid IP address format");
        return (
            StatusCode::BAD_REQUEST,
            Json(CheckResponse {
                allowed: false,
                reason: Some("Invalid IP address format".to_string()),
                code: None,
                retry_after_secs: None,
                remaining: None,
            }),
        );
    }

    let method = match req.method.as_deref().map(str::parse::<Method>) {
        Some(Ok(m)) => Some(m),
        Some(Err(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(CheckResponse {
                    allowed: false,
                    reason: Some("Invalid HTTP method".to_string()),
                    code: None,
                    retry_after_secs: None,
                    remaining: None,
                }),
            );
        }
        None => None,
    };

    let facts = RequestFacts {
        client: &req.ip,
        method: method.as_ref(),
        origin: req.origin.as_deref(),
        host: req.host.as_deref(),
        content_type: req.content_type.as_deref(),
        requested_with: req.requested_with.as_deref(),
    };

    match state.guard.inspect(&facts).await {
        Ok(admitted) => {
            state.metrics.record_allowed();
            debug!(ip = %req.ip, remaining = admitted.remaining, "Request allowed");
            (
                StatusCode::OK,
                Json(CheckResponse {
                    allowed: true,
                    reason: None,
                    code: None,
                    retry_after_secs: None,
                    remaining: Some(admitted.remaining),
                }),
            )
        }
        Err(err) => {
            info!(ip = %req.ip, code = err.code(), error = %err, "Request denied");
            state.metrics.record_rejected(err.code());
            (StatusCode::OK, Json(CheckResponse::denied(&err)))
        }
    }
}

/// Prometheus exposition.
pub async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => GuardError::Internal(e.to_string()).into_response(),
    }
}

pub async fn admin_index() -> Json<Value> {
    Json(json!({ "status": "success" }))
}

/// Accept an arbitrary JSON document and echo its sanitized form.
pub async fn admin_submit(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, GuardError> {
    let raw = std::str::from_utf8(&body).map_err(|_| state.reject(GuardError::MalformedJson))?;
    let data = safe_json_parse(raw, state.config.content.max_json_depth)
        .into_result()
        .map_err(|e| state.reject(e))?;

    Ok(Json(json!({ "status": "success", "data": data })))
}

pub async fn submit_blog_post(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<BlogPostResponse>, GuardError> {
    let post: BlogPostRequest = parse_body(&state, &body)?;

    let content = state
        .content
        .validate_blog_post(&post.content)
        .into_result()
        .map_err(|e| state.reject(e))?;

    Ok(Json(BlogPostResponse {
        status: "success",
        title: sanitize_input(&post.title),
        content,
    }))
}

pub async fn validate_upload(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, GuardError> {
    let upload: UploadRequest = parse_body(&state, &body)?;

    validate_file_upload(&upload.content_type, upload.size, &state.config.uploads)
        .into_result()
        .map_err(|e| state.reject(e))?;

    Ok(Json(json!({ "valid": true })))
}

pub async fn validate_link(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, GuardError> {
    let link: LinkRequest = parse_body(&state, &body)?;

    let url = validate_url(&link.url)
        .into_result()
        .map_err(|e| state.reject(e))?;

    Ok(Json(json!({ "valid": true, "url": url.as_str() })))
}

pub async fn status_tone(Path(status): Path<String>) -> Json<StatusToneResponse> {
    let tone = StatusTone::for_status(&status);
    Json(StatusToneResponse {
        status,
        tone,
        classes: tone.classes(),
    })
}

/// Fresh random token for admin forms.
pub async fn issue_token() -> Json<Value> {
    Json(json!({ "token": generate_secure_token(DEFAULT_TOKEN_BYTES) }))
}

fn parse_body<T: DeserializeOwned>(state: &AppState, body: &[u8]) -> Result<T, GuardError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Request body did not match the expected shape");
        state.reject(GuardError::MalformedJson)
    })
}
