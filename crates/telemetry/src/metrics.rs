//! In-process metrics for submissions, sinks, and reads.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Latency histogram in milliseconds.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, then overflow
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 10] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000];

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let slot = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len());
        self.buckets[slot].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum.load(Ordering::Relaxed) as f64 / count as f64
        }
    }

    /// Returns `(upper bound, count)` pairs; the overflow bucket has bound `u64::MAX`.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .copied()
            .chain(std::iter::once(u64::MAX))
            .zip(self.buckets.iter())
            .map(|(bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Metrics for the survey engine.
#[derive(Debug, Default)]
pub struct Metrics {
    // Ingestion
    pub submissions_received: Counter,
    pub submissions_rejected: Counter,

    // Record store sink
    pub store_inserts: Counter,
    pub store_insert_errors: Counter,

    // Mirror sink
    pub mirror_forwards: Counter,
    pub mirror_forward_errors: Counter,

    // Read path
    pub reads: Counter,
    pub reads_from_mirror: Counter,
    pub reads_from_store: Counter,
    pub reads_empty: Counter,
    pub mirror_read_errors: Counter,
    pub store_read_errors: Counter,

    // Latency
    pub submit_latency_ms: Histogram,
    pub read_latency_ms: Histogram,
    pub mirror_latency_ms: Histogram,
}

/// A point-in-time copy of the metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub submissions_received: u64,
    pub submissions_rejected: u64,
    pub store_inserts: u64,
    pub store_insert_errors: u64,
    pub mirror_forwards: u64,
    pub mirror_forward_errors: u64,
    pub reads: u64,
    pub reads_from_mirror: u64,
    pub reads_from_store: u64,
    pub reads_empty: u64,
    pub mirror_read_errors: u64,
    pub store_read_errors: u64,
    pub submit_latency_mean_ms: f64,
    pub read_latency_mean_ms: f64,
    pub mirror_latency_mean_ms: f64,
}

impl Metrics {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            submissions_received: self.submissions_received.get(),
            submissions_rejected: self.submissions_rejected.get(),
            store_inserts: self.store_inserts.get(),
            store_insert_errors: self.store_insert_errors.get(),
            mirror_forwards: self.mirror_forwards.get(),
            mirror_forward_errors: self.mirror_forward_errors.get(),
            reads: self.reads.get(),
            reads_from_mirror: self.reads_from_mirror.get(),
            reads_from_store: self.reads_from_store.get(),
            reads_empty: self.reads_empty.get(),
            mirror_read_errors: self.mirror_read_errors.get(),
            store_read_errors: self.store_read_errors.get(),
            submit_latency_mean_ms: self.submit_latency_ms.mean(),
            read_latency_mean_ms: self.read_latency_ms.mean(),
            mirror_latency_mean_ms: self.mirror_latency_ms.mean(),
        }
    }

    /// Log the current counters at info level.
    pub fn log_snapshot(&self) {
        let s = self.snapshot();
        tracing::info!(
            submissions_received = s.submissions_received,
            submissions_rejected = s.submissions_rejected,
            store_inserts = s.store_inserts,
            store_insert_errors = s.store_insert_errors,
            mirror_forwards = s.mirror_forwards,
            mirror_forward_errors = s.mirror_forward_errors,
            reads = s.reads,
            reads_from_mirror = s.reads_from_mirror,
            reads_from_store = s.reads_from_store,
            submit_latency_mean_ms = s.submit_latency_mean_ms,
            read_latency_mean_ms = s.read_latency_mean_ms,
            "Metrics snapshot"
        );
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::default);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
