// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the admin request guard.
//!
//! Defaults match the admin panel's security settings: 100 requests per
//! minute per client, the blog tag allow-list, 5 MB uploads and the local
//! development origin.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Configuration for the admin guard service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Rich content and JSON validation configuration
    #[serde(default)]
    pub content: ContentConfig,

    /// File upload constraints
    #[serde(default)]
    pub uploads: UploadConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Admin IP allow-list
    #[serde(default)]
    pub access: AccessConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window per client (default: 100)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Interval between stale-record sweeps in milliseconds (default: 60000)
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

/// Rich content validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// HTML tags permitted in blog post content
    #[serde(default = "default_allowed_tags")]
    pub allowed_tags: Vec<String>,

    /// Maximum nesting depth accepted by the JSON validator (default: 64)
    #[serde(default = "default_max_json_depth")]
    pub max_json_depth: usize,
}

/// Upload constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum upload size in bytes (default: 5 MB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_size_bytes: u64,

    /// Accepted MIME types
    #[serde(default = "default_upload_types")]
    pub allowed_types: Vec<String>,
}

/// CORS configuration for the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,

    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,

    /// Preflight cache lifetime in seconds (default: 86400)
    #[serde(default = "default_cors_max_age")]
    pub max_age_secs: u64,
}

/// Client allow-list for the admin tree. Empty disables the check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub allowed_ips: Vec<String>,

    /// Require `X-Requested-With` and `Content-Type` on every admin request
    #[serde(default)]
    pub require_request_headers: bool,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_sweep_interval_ms() -> u64 {
    60_000
}

fn default_allowed_tags() -> Vec<String> {
    [
        "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "blockquote", "img",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_json_depth() -> usize {
    64
}

fn default_max_upload_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_upload_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/gif", "application/pdf"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_allowed_headers() -> Vec<String> {
    ["Content-Type", "Authorization", "X-Requested-With"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_cors_max_age() -> u64 {
    86_400
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            content: ContentConfig::default(),
            uploads: UploadConfig::default(),
            cors: CorsConfig::default(),
            access: AccessConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_ms: default_window_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            allowed_tags: default_allowed_tags(),
            max_json_depth: default_max_json_depth(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_upload_bytes(),
            allowed_types: default_upload_types(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            max_age_secs: default_cors_max_age(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Get the sweep interval
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Config {
    /// Load configuration from environment variables on top of the defaults.
    ///
    /// - `BIND_ADDR`: Server bind address
    /// - `RATE_LIMIT_MAX_REQUESTS`: Requests per window per client
    /// - `RATE_LIMIT_WINDOW_MS`: Window length in milliseconds
    /// - `RATE_LIMIT_SWEEP_MS`: Sweep interval in milliseconds
    /// - `ALLOWED_ORIGINS`: Comma separated CORS origins
    /// - `ADMIN_ALLOWED_IPS`: Comma separated client allow-list
    /// - `ADMIN_REQUIRE_HEADERS`: `true` to require `X-Requested-With`
    /// - `UPLOAD_MAX_BYTES`: Maximum upload size
    /// - `METRICS_ENABLED`: `true` / `false`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(max) = parse_var(&lookup, "RATE_LIMIT_MAX_REQUESTS") {
            config.rate_limit.max_requests = max;
        }
        if let Some(window) = parse_var(&lookup, "RATE_LIMIT_WINDOW_MS") {
            config.rate_limit.window_ms = window;
        }
        if let Some(sweep) = parse_var(&lookup, "RATE_LIMIT_SWEEP_MS") {
            config.rate_limit.sweep_interval_ms = sweep;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            config.cors.allowed_origins = split_list(&origins);
        }
        if let Some(ips) = lookup("ADMIN_ALLOWED_IPS") {
            config.access.allowed_ips = split_list(&ips);
        }
        if let Some(required) = parse_var(&lookup, "ADMIN_REQUIRE_HEADERS") {
            config.access.require_request_headers = required;
        }
        if let Some(max) = parse_var(&lookup, "UPLOAD_MAX_BYTES") {
            config.uploads.max_size_bytes = max;
        }
        if let Some(enabled) = parse_var(&lookup, "METRICS_ENABLED") {
            config.metrics.enabled = enabled;
        }

        config
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
