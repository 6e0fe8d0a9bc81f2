// Order Metrics - lock-free counters and a sliding-window latency sample

use crate::application::constants::P90_QUANTILE;
use crate::domain::shop::DEFAULT_METRICS_WINDOW;
use crate::domain::{MetricsSnapshot, OrderResult};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Process-wide order metrics.
///
/// Counters are plain atomics. Latencies go into a fixed ring of the most
/// recent `window` samples: each writer claims a slot with one `fetch_add`
/// and overwrites it, so writers never block each other or readers.
/// Percentiles are therefore approximate. They describe the last `window`
/// completed orders, not all history, and a read racing a write may see a
/// slot before its new value lands.
pub struct OrderMetrics {
    total_batches: AtomicU64,
    total_submitted: AtomicU64,
    total_completed: AtomicU64,
    latencies: Box<[AtomicI64]>,
    write_idx: AtomicU64,
}

impl Default for OrderMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_METRICS_WINDOW)
    }
}

impl OrderMetrics {
    /// Create metrics keeping the latest `window` latencies (at least 1)
    pub fn new(window: usize) -> Self {
        let latencies = (0..window.max(1)).map(|_| AtomicI64::new(0)).collect();
        Self {
            total_batches: AtomicU64::new(0),
            total_submitted: AtomicU64::new(0),
            total_completed: AtomicU64::new(0),
            latencies,
            write_idx: AtomicU64::new(0),
        }
    }

    pub fn window(&self) -> usize {
        self.latencies.len()
    }

    /// One batch of `order_count` orders was submitted
    pub fn record_batch(&self, order_count: usize) {
        self.total_batches.fetch_add(1, Ordering::Relaxed);
        self.total_submitted
            .fetch_add(order_count as u64, Ordering::Relaxed);
    }

    /// One order completed. Results without steps count but add no latency sample.
    pub fn record_order(&self, result: &OrderResult) {
        self.total_completed.fetch_add(1, Ordering::Relaxed);

        let Some(latency_ms) = result.latency_ms() else {
            return;
        };

        let idx = self.write_idx.fetch_add(1, Ordering::AcqRel);
        let slot = (idx % self.latencies.len() as u64) as usize;
        self.latencies[slot].store(latency_ms, Ordering::Release);
    }

    pub fn total_batches(&self) -> u64 {
        self.total_batches.load(Ordering::Relaxed)
    }

    pub fn total_submitted(&self) -> u64 {
        self.total_submitted.load(Ordering::Relaxed)
    }

    pub fn total_completed(&self) -> u64 {
        self.total_completed.load(Ordering::Relaxed)
    }

    /// Number of latency samples currently held (≤ window)
    pub fn sample_count(&self) -> usize {
        let written = self.write_idx.load(Ordering::Acquire);
        written.min(self.latencies.len() as u64) as usize
    }

    /// Nearest-rank percentile over the current window; 0 with no samples.
    /// `quantile` is clamped to [0, 1].
    pub fn latency_percentile_ms(&self, quantile: f64) -> i64 {
        let count = self.sample_count();
        if count == 0 {
            return 0;
        }

        let mut samples: Vec<i64> = self.latencies[..count]
            .iter()
            .map(|slot| slot.load(Ordering::Acquire))
            .collect();
        samples.sort_unstable();

        let rank = (count as f64 * quantile.clamp(0.0, 1.0)) as usize;
        samples[rank.min(count - 1)]
    }

    pub fn p90_latency_ms(&self) -> i64 {
        self.latency_percentile_ms(P90_QUANTILE)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_batches: self.total_batches(),
            total_orders_submitted: self.total_submitted(),
            total_orders_completed: self.total_completed(),
            p90_latency_ms: self.p90_latency_ms(),
        }
    }
}
