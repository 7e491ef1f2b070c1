// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Attack signature detection.
//!
//! Signatures are checked in a fixed order and the first match wins:
//! script injection, SQL keywords, path traversal, command execution.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Category of a detected attack signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreatKind {
    Xss,
    SqlInjection,
    PathTraversal,
    CommandInjection,
}

impl ThreatKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Xss => "XSS_DETECTED",
            Self::SqlInjection => "SQL_INJECTION_DETECTED",
            Self::PathTraversal => "PATH_TRAVERSAL_DETECTED",
            Self::CommandInjection => "COMMAND_INJECTION_DETECTED",
        }
    }
}

impl std::fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xss => write!(f, "Potential XSS attack detected"),
            Self::SqlInjection => write!(f, "Potential SQL injection detected"),
            Self::PathTraversal => write!(f, "Directory traversal attempt detected"),
            Self::CommandInjection => write!(f, "Potential command injection detected"),
        }
    }
}

/// Outcome of a signature scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Safe,
    Threat(ThreatKind),
}

impl Detection {
    pub fn is_safe(&self) -> bool {
        matches!(self, Detection::Safe)
    }

    pub fn threat(&self) -> Option<ThreatKind> {
        match self {
            Detection::Safe => None,
            Detection::Threat(kind) => Some(*kind),
        }
    }

    /// Human-readable message for an unsafe input.
    pub fn error(&self) -> Option<String> {
        self.threat().map(|kind| kind.to_string())
    }
}

struct Signature {
    kind: ThreatKind,
    pattern: Regex,
}

static SIGNATURES: LazyLock<Vec<Signature>> = LazyLock::new(|| {
    [
        (ThreatKind::Xss, r"(?i)(<script|javascript:|data:text/html)"),
        (
            ThreatKind::SqlInjection,
            r"(?i)(union|select|insert|drop|delete|update)\s+",
        ),
        (ThreatKind::PathTraversal, r"\.\./"),
        (ThreatKind::CommandInjection, r"(?i)(exec|system|eval)\("),
    ]
    .into_iter()
    .map(|(kind, pattern)| Signature {
        kind,
        pattern: Regex::new(pattern).expect("signature patterns are valid"),
    })
    .collect()
});

/// Scan `input` against the attack signatures.
pub fn detect(input: &str) -> Detection {
    match SIGNATURES.iter().find(|sig| sig.pattern.is_match(input)) {
        Some(sig) => {
            debug!(threat = ?sig.kind, "Attack signature matched");
            Detection::Threat(sig.kind)
        }
        None => Detection::Safe,
    }
}
