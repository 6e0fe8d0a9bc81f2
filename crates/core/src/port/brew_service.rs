// Brew Service Port
// The surface the transport layer drives: run a batch, read the stats

use crate::domain::{MetricsSnapshot, Order, OrderResult};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Brew Service trait
///
/// Implementations:
/// - BrewOrchestrator: runs orders against the shared equipment registry
#[async_trait]
pub trait BrewService: Send + Sync {
    /// Execute a batch of orders with `baristas` concurrent workers.
    ///
    /// Returns the results of every order that completed before `cancel`
    /// fired. A result list shorter than `orders` is a valid outcome, not an
    /// error. Result order is unrelated to input order.
    async fn execute_brew(
        &self,
        cancel: CancellationToken,
        orders: Vec<Order>,
        baristas: usize,
    ) -> Vec<OrderResult>;

    /// Current process-wide order metrics
    fn stats(&self) -> MetricsSnapshot;
}
