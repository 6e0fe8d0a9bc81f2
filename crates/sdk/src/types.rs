//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate.

use serde::{Deserialize, Serialize};

/// One order to brew. `drink` is a menu name such as `"latte"`; names the
/// daemon does not recognize are accepted and then abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub id: i64,
    pub drink: String,
}

impl OrderRequest {
    pub fn new(id: i64, drink: impl Into<String>) -> Self {
        Self {
            id,
            drink: drink.into(),
        }
    }
}

/// One equipment step of a finished order, in daemon-clock milliseconds.
/// `start_ms`/`end_ms` include queueing; `hold_*` is when the equipment was in use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StepResult {
    pub equipment: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub hold_start_ms: i64,
    pub hold_end_ms: i64,
}

impl StepResult {
    /// Time spent waiting for a free unit
    pub fn queued_ms(&self) -> i64 {
        (self.hold_start_ms - self.start_ms).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderResult {
    pub order_id: i64,
    pub steps: Vec<StepResult>,
}

impl OrderResult {
    /// First step start to last step end
    pub fn latency_ms(&self) -> Option<i64> {
        let first = self.steps.first()?;
        let last = self.steps.last()?;
        Some(last.end_ms - first.start_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ExecuteBrewResponse {
    pub results: Vec<OrderResult>,
}

/// Response from admin.stats.v1
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatsResponse {
    pub total_batches: u64,
    pub total_orders_submitted: u64,
    pub total_orders_completed: u64,
    pub p90_latency_ms: i64,
}
