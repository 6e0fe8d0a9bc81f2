//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};

/// One order on the wire. Unknown drink names map to `unspecified`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderParams {
    pub id: i64,
    #[serde(default)]
    pub drink: String,
}

/// brew.execute.v1 - Run a batch of orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteBrewRequest {
    pub baristas: i64,
    #[serde(default)]
    pub orders: Vec<OrderParams>,
}

/// `start_ms`/`end_ms` include queueing; `hold_*` is when the equipment was in use
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResponse {
    pub equipment: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub hold_start_ms: i64,
    pub hold_end_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResultResponse {
    pub order_id: i64,
    pub steps: Vec<StepResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteBrewResponse {
    pub results: Vec<OrderResultResponse>,
}

/// admin.stats.v1 - Get order statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_batches: u64,
    pub total_orders_submitted: u64,
    pub total_orders_completed: u64,
    pub p90_latency_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_missing_drink_defaults_empty() {
        let req: ExecuteBrewRequest = serde_json::from_value(json!({
            "baristas": 2,
            "orders": [{ "id": 1, "drink": "latte" }, { "id": 2 }]
        }))
        .unwrap();

        assert_eq!(req.baristas, 2);
        assert_eq!(req.orders[0].drink, "latte");
        assert_eq!(req.orders[1].drink, "");
    }

    #[test]
    fn test_stats_wire_names() {
        let value = serde_json::to_value(StatsResponse {
            total_batches: 1,
            total_orders_submitted: 3,
            total_orders_completed: 2,
            p90_latency_ms: 28,
        })
        .unwrap();

        assert_eq!(value["total_orders_completed"], 2);
        assert_eq!(value["p90_latency_ms"], 28);
    }
}
