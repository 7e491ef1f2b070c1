// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Header names, the security header set and CORS construction.

use crate::config::CorsConfig;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

/// X-Forwarded-For header - first entry is the originating client.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Origin header.
pub const ORIGIN: &str = "origin";

/// Host header.
pub const HOST: &str = "host";

/// Content-Type header.
pub const CONTENT_TYPE: &str = "content-type";

pub const X_REQUESTED_WITH: &str = "x-requested-with";

/// Headers attached to every guarded response.
pub const SECURITY_HEADERS: [(&str, &str); 7] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    (
        "content-security-policy",
        "default-src 'self'; img-src 'self' data: https:; script-src 'self'",
    ),
    (
        "strict-transport-security",
        "max-age=31536000; includeSubDomains",
    ),
    (
        "permissions-policy",
        "camera=(), microphone=(), geolocation=()",
    ),
];

/// Admin responses must not be cached.
pub const NO_STORE: (&str, &str) = ("cache-control", "no-store, max-age=0");

/// The security header set as a fresh map.
pub fn security_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(SECURITY_HEADERS.len());
    apply_security_headers(&mut headers);
    headers
}

/// Insert the security header set and the no-store directive, replacing
/// any values already present.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS.iter().chain(std::iter::once(&NO_STORE)) {
        headers.insert(
            HeaderName::from_static(*name),
            HeaderValue::from_static(*value),
        );
    }
}

/// Build the CORS layer for the admin tree. A `*` entry in any list allows
/// everything for that list. Entries that are not valid header values,
/// methods or names are skipped with a warning.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().max_age(Duration::from_secs(config.max_age_secs));

    let layer = if is_wildcard(&config.allowed_origins) {
        layer.allow_origin(AllowOrigin::any())
    } else {
        layer.allow_origin(AllowOrigin::list(origin_values(&config.allowed_origins)))
    };

    let layer = if is_wildcard(&config.allowed_methods) {
        layer.allow_methods(AllowMethods::any())
    } else {
        layer.allow_methods(AllowMethods::list(method_values(&config.allowed_methods)))
    };

    if is_wildcard(&config.allowed_headers) {
        layer.allow_headers(AllowHeaders::any())
    } else {
        layer.allow_headers(AllowHeaders::list(header_names(&config.allowed_headers)))
    }
}

fn is_wildcard(entries: &[String]) -> bool {
    entries.iter().any(|entry| entry.trim() == "*")
}

fn origin_values(allowed_origins: &[String]) -> Vec<HeaderValue> {
    allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect()
}

fn method_values(allowed_methods: &[String]) -> Vec<Method> {
    allowed_methods
        .iter()
        .filter_map(|method| match method.parse::<Method>() {
            Ok(m) => Some(m),
            Err(_) => {
                warn!(method = %method, "Skipping invalid CORS method");
                None
            }
        })
        .collect()
}

fn header_names(allowed_headers: &[String]) -> Vec<HeaderName> {
    allowed_headers
        .iter()
        .filter_map(|name| match HeaderName::from_bytes(name.as_bytes()) {
            Ok(h) => Some(h),
            Err(_) => {
                warn!(header = %name, "Skipping invalid CORS header");
                None
            }
        })
        .collect()
}
