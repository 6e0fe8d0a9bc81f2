// Metrics Snapshot - point-in-time read of the order metrics

use serde::{Deserialize, Serialize};

/// Point-in-time view of the process-wide order metrics.
///
/// Counters only ever grow. `p90_latency_ms` is approximate: it is taken
/// over a bounded window of the most recent completions, not all history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_batches: u64,
    pub total_orders_submitted: u64,
    pub total_orders_completed: u64,
    pub p90_latency_ms: i64,
}
