// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Attack simulation patterns for security testing.

/// What the simulated client puts in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Benign,
    Xss,
    SqlInjection,
    PathTraversal,
    CommandInjection,
    DisallowedTags,
}

/// How the simulated client fills the `Origin` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginMode {
    SameHost,
    Spoofed,
    Missing,
}

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Number of distinct forwarded-for identities
    pub unique_clients: usize,
    /// Body payload family
    pub payload: PayloadKind,
    /// Origin header behaviour
    pub origin: OriginMode,
    /// Whether to send `application/json`
    pub json_content_type: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_clients: 1,
            payload: PayloadKind::Benign,
            origin: OriginMode::SameHost,
            json_content_type: true,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// One client hammering the admin API.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 300,
            ..Default::default()
        }
    }

    /// Many clients, each staying under the per-client limit.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// Cross-site requests carrying another site's origin.
    pub fn origin_spoofing() -> Self {
        Self {
            total_requests: 50,
            unique_clients: 10,
            origin: OriginMode::Spoofed,
            ..Default::default()
        }
    }

    /// Scripted requests that never send an origin.
    pub fn missing_origin() -> Self {
        Self {
            total_requests: 50,
            unique_clients: 10,
            origin: OriginMode::Missing,
            ..Default::default()
        }
    }

    /// Form posts trying to slip past the JSON-only rule.
    pub fn content_type_bypass() -> Self {
        Self {
            total_requests: 50,
            unique_clients: 10,
            json_content_type: false,
            ..Default::default()
        }
    }

    /// Admitted requests carrying a hostile payload.
    pub fn payload_campaign(payload: PayloadKind) -> Self {
        Self {
            total_requests: 60,
            unique_clients: 20,
            payload,
            ..Default::default()
        }
    }

    /// Expected outcomes for this pattern.
    pub fn expectations(&self) -> AttackExpectations {
        let hostile = self.origin != OriginMode::SameHost
            || !self.json_content_type
            || self.payload != PayloadKind::Benign;

        AttackExpectations {
            max_allowed_ratio: if hostile { 0.0 } else { 1.0 },
            expect_rate_limited: self.total_requests / self.unique_clients.max(1) > 100,
        }
    }
}

/// Expected outcomes for validation.
#[derive(Debug, Clone)]
pub struct AttackExpectations {
    /// Upper bound on the share of requests that get through
    pub max_allowed_ratio: f64,
    /// Whether the per-client limit should trip
    pub expect_rate_limited: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expectations() {
        assert!(AttackConfig::single_client_flood().expectations().expect_rate_limited);
        assert!(!AttackConfig::distributed_flood().expectations().expect_rate_limited);
        assert_eq!(
            AttackConfig::origin_spoofing().expectations().max_allowed_ratio,
            0.0
        );
        assert_eq!(
            AttackConfig::payload_campaign(PayloadKind::Benign)
                .expectations()
                .max_allowed_ratio,
            1.0
        );
    }
}
