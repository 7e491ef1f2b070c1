// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for attack simulation results.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Collects metrics during attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    start_time: Option<Instant>,
    end_time: Option<Instant>,
    outcomes: HashMap<Outcome, usize>,
    requests_per_client: HashMap<String, usize>,
    /// Latency samples (microseconds)
    latencies: Vec<u64>,
}

/// Possible outcomes for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Allowed,
    RateLimited,
    OriginRejected,
    ContentTypeRejected,
    PayloadRejected,
    Hidden,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Record a request outcome.
    pub fn record(&mut self, outcome: Outcome, client: &str, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_client.entry(client.to_string()).or_insert(0) += 1;
        self.latencies.push(latency.as_micros() as u64);
    }

    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn duration(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Ratio of non-allowed requests to total.
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Outcome::Allowed)) as f64 / total as f64
    }

    fn sorted_latencies(&self) -> Vec<u64> {
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted
    }

    pub fn median_latency_us(&self) -> u64 {
        let sorted = self.sorted_latencies();
        sorted.get(sorted.len() / 2).copied().unwrap_or(0)
    }

    pub fn p99_latency_us(&self) -> u64 {
        let sorted = self.sorted_latencies();
        if sorted.is_empty() {
            return 0;
        }
        let idx = (sorted.len() as f64 * 0.99) as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    pub fn unique_clients(&self) -> usize {
        self.requests_per_client.len()
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            allowed: self.count(Outcome::Allowed),
            rate_limited: self.count(Outcome::RateLimited),
            origin_rejected: self.count(Outcome::OriginRejected),
            content_type_rejected: self.count(Outcome::ContentTypeRejected),
            payload_rejected: self.count(Outcome::PayloadRejected),
            hidden: self.count(Outcome::Hidden),
            duration_ms: self.duration().as_millis() as u64,
            block_rate: self.block_rate(),
            median_latency_us: self.median_latency_us(),
            p99_latency_us: self.p99_latency_us(),
            unique_clients: self.unique_clients(),
        }
    }
}

/// Summary report of attack metrics.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub allowed: usize,
    pub rate_limited: usize,
    pub origin_rejected: usize,
    pub content_type_rejected: usize,
    pub payload_rejected: usize,
    pub hidden: usize,
    pub duration_ms: u64,
    pub block_rate: f64,
    pub median_latency_us: u64,
    pub p99_latency_us: u64,
    pub unique_clients: usize,
}

impl MetricsReport {
    pub fn allowed_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.allowed as f64 / self.total_requests as f64
    }
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Attack Metrics Report ===")?;
        writeln!(f, "Duration:          {} ms", self.duration_ms)?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Allowed:           {} ({:.1}%)", self.allowed, self.allowed_ratio() * 100.0)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Bad Origin:        {}", self.origin_rejected)?;
        writeln!(f, "Bad Content-Type:  {}", self.content_type_rejected)?;
        writeln!(f, "Bad Payload:       {}", self.payload_rejected)?;
        writeln!(f, "Hidden (404):      {}", self.hidden)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "--- Latency ---")?;
        writeln!(f, "Median:            {} us", self.median_latency_us)?;
        writeln!(f, "P99:               {} us", self.p99_latency_us)?;
        writeln!(f)?;
        writeln!(f, "Unique Clients:    {}", self.unique_clients)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();
        metrics.start();

        metrics.record(Outcome::Allowed, "10.0.0.1", Duration::from_micros(100));
        metrics.record(Outcome::Allowed, "10.0.0.2", Duration::from_micros(150));
        metrics.record(Outcome::RateLimited, "10.0.0.1", Duration::from_micros(50));

        metrics.finish();

        assert_eq!(metrics.total_requests(), 3);
        assert_eq!(metrics.count(Outcome::Allowed), 2);
        assert_eq!(metrics.count(Outcome::RateLimited), 1);
        assert_eq!(metrics.unique_clients(), 2);
        assert_eq!(metrics.median_latency_us(), 100);
    }

    #[test]
    fn test_block_rate() {
        let mut metrics = AttackMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Allowed, "10.0.0.1", Duration::ZERO);
        }
        for _ in 0..7 {
            metrics.record(Outcome::OriginRejected, "10.0.0.1", Duration::ZERO);
        }

        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
    }
}
