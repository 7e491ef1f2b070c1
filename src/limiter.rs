// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for the admin API.
//!
//! Each client key gets a counter and a window start. Requests inside the
//! window increment the counter; the first request after the window has
//! elapsed starts a fresh window. Denied requests still increment the
//! stored counter.
//!
//! Stale records are removed by a sweeper task owned through a
//! [`SweeperHandle`], so each limiter instance has an explicit lifecycle.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Requests recorded in the current window, including this one
        count: u32,
        /// Time until the window rolls over
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Per-key counter state.
#[derive(Debug, Clone, Copy)]
struct RateRecord {
    count: u32,
    window_start: Instant,
}

type RecordMap = Arc<RwLock<HashMap<String, RateRecord>>>;

/// Thread-safe rate limiter.
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    /// Per-key records
    records: RecordMap,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Record a request for `key` and report whether it is allowed.
    pub async fn check(&self, key: &str) -> bool {
        self.evaluate(key).await.is_allowed()
    }

    /// Record a request for `key` and return the detailed outcome.
    ///
    /// The read-modify-write happens under the write lock, so a concurrent
    /// sweep or check on the same key never observes a torn record.
    pub async fn evaluate(&self, key: &str) -> RateLimitResult {
        let window = self.config.window_duration();
        let limit = self.config.max_requests;

        let mut records = self.records.write().await;
        let now = Instant::now();
        let record = records.entry(key.to_owned()).or_insert(RateRecord {
            count: 0,
            window_start: now,
        });

        let elapsed = now.duration_since(record.window_start);
        if elapsed > window {
            record.count = 1;
            record.window_start = now;
        } else {
            record.count = record.count.saturating_add(1);
            if record.count > limit {
                let retry_after = window.saturating_sub(elapsed);
                debug!(key, count = record.count, ?retry_after, "Rate limit exceeded");
                return RateLimitResult::Limited {
                    count: record.count,
                    retry_after,
                };
            }
        }

        RateLimitResult::Allowed {
            remaining: limit.saturating_sub(record.count),
            reset_in: window.saturating_sub(now.duration_since(record.window_start)),
        }
    }

    /// Remove records whose window has elapsed. Returns the number removed.
    pub async fn sweep(&self) -> usize {
        sweep_records(&self.records, self.config.window_duration()).await
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.records.read().await.len()
    }

    /// Start the periodic sweep on the current runtime.
    ///
    /// The task runs until [`SweeperHandle::shutdown`] is called or the
    /// handle is dropped.
    pub fn spawn_sweeper(&self) -> SweeperHandle {
        let records = self.records.clone();
        let window = self.config.window_duration();
        // tokio intervals reject a zero period.
        let every = self.config.sweep_interval().max(Duration::from_millis(1));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        sweep_records(&records, window).await;
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
            debug!("Rate limit sweeper stopped");
        });

        info!(interval_ms = every.as_millis() as u64, "Rate limit sweeper started");
        SweeperHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

async fn sweep_records(records: &RecordMap, window: Duration) -> usize {
    let now = Instant::now();
    let mut records = records.write().await;
    let before = records.len();
    records.retain(|_, record| now.duration_since(record.window_start) <= window);
    let removed = before - records.len();
    if removed > 0 {
        debug!(removed, remaining = records.len(), "Swept stale rate limit records");
    }
    removed
}

/// Owner of a running sweeper task.
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Signal the sweeper to stop and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
