// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for guard decisions.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Guard outcome counters in a private registry.
pub struct GuardMetrics {
    registry: Registry,
    decisions: IntCounterVec,
    rejections: IntCounterVec,
}

impl GuardMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let decisions = IntCounterVec::new(
            Opts::new(
                "admin_guard_decisions_total",
                "Guard decisions by outcome",
            ),
            &["outcome"],
        )?;
        let rejections = IntCounterVec::new(
            Opts::new(
                "admin_guard_rejections_total",
                "Rejected requests and payloads by reason code",
            ),
            &["code"],
        )?;

        registry.register(Box::new(decisions.clone()))?;
        registry.register(Box::new(rejections.clone()))?;

        Ok(Self {
            registry,
            decisions,
            rejections,
        })
    }

    pub fn record_allowed(&self) {
        self.decisions.with_label_values(&["allowed"]).inc();
    }

    pub fn record_rejected(&self, code: &str) {
        self.decisions.with_label_values(&["rejected"]).inc();
        self.rejections.with_label_values(&[code]).inc();
    }

    /// Count of rejections recorded under `code`.
    pub fn rejections(&self, code: &str) -> u64 {
        self.rejections.with_label_values(&[code]).get()
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
