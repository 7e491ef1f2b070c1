// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Admin Request Guard
//!
//! This crate gates the wellness site's admin API:
//!
//! - Per-client fixed-window rate limiting (100 requests per minute default)
//! - Origin validation against the request host
//! - JSON content-type enforcement for body-bearing requests
//! - Attack signature detection (XSS, SQL injection, traversal, command injection)
//! - String and JSON sanitization
//! - Blog post content gating with a tag allow-list
//! - Security response headers
//! - Random hex tokens

pub mod config;
pub mod content;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod headers;
pub mod limiter;
pub mod metrics;
pub mod patterns;
pub mod sanitizer;
pub mod status;
pub mod token;
pub mod upload;
pub mod verdict;

pub use config::Config;
pub use content::ContentValidator;
pub use error::GuardError;
pub use guard::RequestGuard;
pub use limiter::{RateLimitResult, RateLimiter, SweeperHandle};
pub use patterns::{detect, Detection, ThreatKind};
pub use sanitizer::{safe_json_parse, sanitize_input, validate_json};
pub use token::generate_secure_token;
pub use verdict::Verdict;
