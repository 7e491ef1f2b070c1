// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request guard for the admin API.
//!
//! Checks run in a fixed order and the first failure short-circuits:
//! 1. Client allow-list (when configured)
//! 2. Rate limit
//! 3. Origin against the request host
//! 4. Required request headers (when configured)
//! 5. JSON content type for body-bearing methods
//!
//! Every response leaving the guarded tree carries the security header set.

use crate::config::Config;
use crate::error::{GuardError, Result};
use crate::handlers::AppState;
use crate::headers::{
    apply_security_headers, CONTENT_TYPE, HOST, ORIGIN, X_FORWARDED_FOR, X_REQUESTED_WITH,
};
use crate::limiter::{RateLimitResult, RateLimiter};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Identity used when no forwarded-for header is present.
pub const LOOPBACK: &str = "127.0.0.1";

/// The request attributes the guard inspects.
#[derive(Debug, Clone, Default)]
pub struct RequestFacts<'a> {
    pub client: &'a str,
    pub method: Option<&'a Method>,
    pub origin: Option<&'a str>,
    pub host: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub requested_with: Option<&'a str>,
}

/// Outcome of a guard pass that let the request through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    /// Requests left in the client's current window
    pub remaining: u32,
}

/// Gate for admin API requests.
pub struct RequestGuard {
    limiter: RateLimiter,
    allowed_ips: Vec<String>,
    allowed_origins: Vec<String>,
    require_request_headers: bool,
}

impl RequestGuard {
    pub fn new(config: &Config) -> Self {
        Self {
            limiter: RateLimiter::new(config.rate_limit.clone()),
            allowed_ips: config.access.allowed_ips.clone(),
            allowed_origins: config.cors.allowed_origins.clone(),
            require_request_headers: config.access.require_request_headers,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Run every check against `facts`. Consumes rate limit quota for the
    /// client unless it is rejected by the allow-list first.
    pub async fn inspect(&self, facts: &RequestFacts<'_>) -> Result<Admitted> {
        if !self.allowed_ips.is_empty() && !self.allowed_ips.iter().any(|ip| ip == facts.client) {
            return Err(GuardError::IpNotAllowed {
                ip: facts.client.to_string(),
            });
        }

        let remaining = match self.limiter.evaluate(facts.client).await {
            RateLimitResult::Allowed { remaining, .. } => remaining,
            RateLimitResult::Limited { retry_after, .. } => {
                return Err(GuardError::RateLimitExceeded { retry_after });
            }
        };

        if !self.origin_allowed(facts.origin, facts.host) {
            return Err(GuardError::InvalidOrigin);
        }

        if self.require_request_headers {
            if facts.requested_with.is_none() {
                return Err(GuardError::MissingRequestHeader {
                    header: X_REQUESTED_WITH,
                });
            }
            if facts.content_type.is_none() {
                return Err(GuardError::MissingRequestHeader {
                    header: CONTENT_TYPE,
                });
            }
        }

        if facts.method.is_some_and(is_body_bearing) && !is_json_content_type(facts.content_type) {
            return Err(GuardError::InvalidContentType {
                actual: facts.content_type.map(str::to_string),
            });
        }

        Ok(Admitted { remaining })
    }

    /// The origin must name the request's own host or be an allowed origin.
    pub fn origin_allowed(&self, origin: Option<&str>, host: Option<&str>) -> bool {
        let Some(origin) = origin.map(str::trim).filter(|o| !o.is_empty()) else {
            return false;
        };

        if self.allowed_origins.iter().any(|allowed| allowed == origin) {
            return true;
        }

        let (Ok(parsed), Some(host)) = (Url::parse(origin), host) else {
            return false;
        };

        match parsed.host_str() {
            Some(origin_host) => origin_host
                .trim_start_matches('[')
                .trim_end_matches(']')
                .eq_ignore_ascii_case(strip_port(host.trim())),
            None => false,
        }
    }
}

/// Client identity: first entry of `X-Forwarded-For`, or loopback when the
/// header is absent or empty. An empty first entry stays empty.
pub fn client_key(headers: &HeaderMap) -> String {
    match headers.get(X_FORWARDED_FOR) {
        Some(value) if !value.is_empty() => String::from_utf8_lossy(value.as_bytes())
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        _ => LOOPBACK.to_string(),
    }
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literal, possibly with a port.
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}

fn is_body_bearing(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Accept `application/json` and `+json` media types, ignoring parameters.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(ct) = content_type else {
        return false;
    };
    let media_type = ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// axum middleware wrapping the admin tree.
pub async fn guard_admin_api(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let client = client_key(headers);
    let method = request.method().clone();
    let origin = header_str(headers, ORIGIN).map(str::to_owned);
    let host = header_str(headers, HOST)
        .or_else(|| request.uri().host())
        .map(str::to_owned);
    let content_type = header_str(headers, CONTENT_TYPE).map(str::to_owned);
    let requested_with = headers
        .get(X_REQUESTED_WITH)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    debug!(
        client = %client,
        method = %method,
        path = %request.uri().path(),
        origin = ?origin,
        "Guarding admin request"
    );

    let facts = RequestFacts {
        client: &client,
        method: Some(&method),
        origin: origin.as_deref(),
        host: host.as_deref(),
        content_type: content_type.as_deref(),
        requested_with: requested_with.as_deref(),
    };

    let verdict = state.guard.inspect(&facts).await;
    let mut response = match verdict {
        Ok(admitted) => {
            state.metrics.record_allowed();
            let mut response = next.run(request).await;
            response
                .headers_mut()
                .insert("x-ratelimit-remaining", HeaderValue::from(admitted.remaining));
            response
        }
        Err(err) => {
            info!(client = %client, code = err.code(), error = %err, "Admin request rejected");
            state.metrics.record_rejected(err.code());
            err.into_response()
        }
    };

    apply_security_headers(response.headers_mut());
    response
}
