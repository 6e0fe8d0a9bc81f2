//! Wire <-> Domain mapping

use crate::types::{
    ExecuteBrewResponse, OrderParams, OrderResultResponse, StatsResponse, StepResponse,
};
use brewline_core::domain::{DrinkType, MetricsSnapshot, Order, OrderResult};

/// Unknown or empty drink names become `DrinkType::Unspecified`
pub fn to_domain_drink(drink: &str) -> DrinkType {
    drink.parse().unwrap_or_default()
}

pub fn to_domain_order(params: &OrderParams) -> Order {
    Order::new(params.id, to_domain_drink(&params.drink))
}

pub fn to_response(results: Vec<OrderResult>) -> ExecuteBrewResponse {
    let results = results
        .into_iter()
        .map(|result| OrderResultResponse {
            order_id: result.order_id,
            steps: result
                .steps
                .into_iter()
                .map(|step| StepResponse {
                    equipment: step.equipment.as_str().to_string(),
                    start_ms: step.start_ms,
                    end_ms: step.end_ms,
                    hold_start_ms: step.held.start_ms,
                    hold_end_ms: step.held.end_ms,
                })
                .collect(),
        })
        .collect();

    ExecuteBrewResponse { results }
}

impl From<MetricsSnapshot> for StatsResponse {
    fn from(snapshot: MetricsSnapshot) -> Self {
        Self {
            total_batches: snapshot.total_batches,
            total_orders_submitted: snapshot.total_orders_submitted,
            total_orders_completed: snapshot.total_orders_completed,
            p90_latency_ms: snapshot.p90_latency_ms,
        }
    }
}
