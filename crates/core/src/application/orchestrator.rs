// Brew Orchestrator - runs a batch of orders on the shared equipment
//
// One batch = one work queue pre-loaded with every order, `baristas`
// long-lived workers draining it, and one results queue feeding the caller.
// A settled counter (completed + abandoned) cancels the batch token once
// every order is accounted for, which releases anything still waiting.

use crate::application::constants::MIN_BARISTAS;
use crate::application::equipment::{EquipmentRegistry, Job};
use crate::application::metrics::OrderMetrics;
use crate::application::queue::{work_queue, WorkQueue};
use crate::domain::{
    DomainError, MetricsSnapshot, Order, OrderResult, OrderState, RecipeCatalog, StepExecution,
};
use crate::error::Result;
use crate::port::id_provider::UuidProvider;
use crate::port::time_provider::SystemTimeProvider;
use crate::port::{BrewService, IdProvider, TimeProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Per-batch accounting returned by `execute_brew_detailed`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrewOutcome {
    pub results: Vec<OrderResult>,
    /// Orders that failed a step (or could not be delivered) and yield no result
    pub abandoned: usize,
    /// Orders still queued when the batch was cancelled
    pub cancelled: usize,
}

impl BrewOutcome {
    pub fn completed(&self) -> usize {
        self.results.len()
    }
}

/// Brew Orchestrator
pub struct BrewOrchestrator {
    registry: Arc<EquipmentRegistry>,
    catalog: Arc<RecipeCatalog>,
    metrics: Arc<OrderMetrics>,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
}

impl BrewOrchestrator {
    pub fn new(
        registry: Arc<EquipmentRegistry>,
        catalog: Arc<RecipeCatalog>,
        metrics: Arc<OrderMetrics>,
    ) -> Self {
        Self {
            registry,
            catalog,
            metrics,
            time_provider: Arc::new(SystemTimeProvider),
            id_provider: Arc::new(UuidProvider),
        }
    }

    pub fn with_time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.time_provider = time_provider;
        self
    }

    pub fn with_id_provider(mut self, id_provider: Arc<dyn IdProvider>) -> Self {
        self.id_provider = id_provider;
        self
    }

    pub fn metrics(&self) -> &Arc<OrderMetrics> {
        &self.metrics
    }

    /// Execute a batch and return the completed results only
    pub async fn execute_brew(
        &self,
        cancel: &CancellationToken,
        orders: Vec<Order>,
        baristas: usize,
    ) -> Vec<OrderResult> {
        self.execute_brew_detailed(cancel, orders, baristas)
            .await
            .results
    }

    /// Execute a batch of orders with `baristas` concurrent workers.
    ///
    /// Returns when every order has completed or been abandoned, or when
    /// `cancel` fires, whichever comes first. Input validation belongs to the
    /// caller; a barista count of 0 is treated as 1.
    pub async fn execute_brew_detailed(
        &self,
        cancel: &CancellationToken,
        orders: Vec<Order>,
        baristas: usize,
    ) -> BrewOutcome {
        let total = orders.len();
        let baristas = baristas.max(MIN_BARISTAS);
        let batch_id = self.id_provider.generate_id();
        let span = info_span!("brew", batch_id = %batch_id, orders = total, baristas);

        self.metrics.record_batch(total);

        // Dropping the guard cancels the batch token, so nothing outlives this call
        let token = cancel.child_token();
        let _batch_guard = token.clone().drop_guard();

        let (order_tx, order_queue) = work_queue(total);
        for order in orders {
            // Capacity equals the batch size, so this never waits
            if order_tx.try_send(order).is_err() {
                error!(parent: &span, order_id = order.id, "Work queue rejected order");
            }
        }
        drop(order_tx);

        let batch = Arc::new(Batch {
            registry: self.registry.clone(),
            catalog: self.catalog.clone(),
            metrics: self.metrics.clone(),
            time_provider: self.time_provider.clone(),
            token: token.clone(),
            total,
            settled: AtomicUsize::new(0),
            abandoned: AtomicUsize::new(0),
        });

        let (result_tx, mut result_rx) = mpsc::channel(total.max(1));
        let mut workers = JoinSet::new();
        for barista in 0..baristas {
            workers.spawn(
                run_barista(barista, batch.clone(), order_queue.clone(), result_tx.clone())
                    .instrument(span.clone()),
            );
        }
        drop(result_tx);

        // Ends once every barista has dropped its sender
        let mut results = Vec::with_capacity(total);
        while let Some(result) = result_rx.recv().await {
            results.push(result);
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(parent: &span, error = ?e, "Barista task failed");
            }
        }

        let mut cancelled = 0;
        for order in order_queue.drain().await {
            let mut state = OrderState::Queued;
            if let Err(e) = state.cancel() {
                error!(parent: &span, order_id = order.id, error = %e, "Unexpected order state");
                continue;
            }
            debug!(parent: &span, order_id = order.id, state = %state, "Order cancelled before dequeue");
            cancelled += 1;
        }
        let abandoned = batch.abandoned.load(Ordering::Acquire);

        info!(
            parent: &span,
            completed = results.len(),
            abandoned,
            cancelled,
            "Brew finished"
        );

        BrewOutcome {
            results,
            abandoned,
            cancelled,
        }
    }
}

#[async_trait]
impl BrewService for BrewOrchestrator {
    async fn execute_brew(
        &self,
        cancel: CancellationToken,
        orders: Vec<Order>,
        baristas: usize,
    ) -> Vec<OrderResult> {
        BrewOrchestrator::execute_brew(self, &cancel, orders, baristas).await
    }

    fn stats(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// State shared by the baristas of one batch
struct Batch {
    registry: Arc<EquipmentRegistry>,
    catalog: Arc<RecipeCatalog>,
    metrics: Arc<OrderMetrics>,
    time_provider: Arc<dyn TimeProvider>,
    token: CancellationToken,
    total: usize,
    settled: AtomicUsize,
    abandoned: AtomicUsize,
}

impl Batch {
    /// Drive one order through its recipe, one blocking submit per step
    async fn brew_order(&self, order: Order, state: &mut OrderState) -> Result<OrderResult> {
        let recipe = self
            .catalog
            .get(order.drink)
            .ok_or_else(|| DomainError::UnknownRecipe(order.drink.to_string()))?;

        let mut steps = Vec::with_capacity(recipe.len());
        for step in recipe.steps() {
            state.advance()?;
            let pool = self.registry.get_pool(step.equipment)?;

            let start_ms = self.time_provider.now_millis();
            let held = pool
                .submit(Job::new(order.id, step.duration), &self.token)
                .await?;
            let end_ms = self.time_provider.now_millis();

            steps.push(StepExecution {
                equipment: step.equipment,
                start_ms,
                end_ms,
                held,
            });
        }

        state.complete()?;
        Ok(OrderResult {
            order_id: order.id,
            steps,
        })
    }

    fn abandon(&self) {
        self.abandoned.fetch_add(1, Ordering::AcqRel);
    }

    /// Count one order as finished; the last one cancels the batch
    fn settle(&self) {
        if self.settled.fetch_add(1, Ordering::AcqRel) + 1 == self.total {
            debug!("All orders accounted for, releasing batch");
            self.token.cancel();
        }
    }
}

async fn run_barista(
    barista: usize,
    batch: Arc<Batch>,
    queue: WorkQueue<Order>,
    results: mpsc::Sender<OrderResult>,
) {
    debug!(barista, "Barista started");

    while let Some(order) = queue.pull(&batch.token).await {
        let mut state = OrderState::Queued;

        match batch.brew_order(order, &mut state).await {
            Ok(result) => {
                let permit = tokio::select! {
                    biased;
                    permit = results.reserve() => permit.ok(),
                    _ = batch.token.cancelled() => None,
                };

                match permit {
                    Some(permit) => {
                        batch.metrics.record_order(&result);
                        permit.send(result);
                        debug!(barista, order_id = order.id, "Order completed");
                    }
                    None => {
                        warn!(barista, order_id = order.id, "Result dropped, batch closed before delivery");
                        batch.abandon();
                    }
                }
            }
            Err(e) => {
                let at = state;
                let _ = state.abandon();
                warn!(barista, order_id = order.id, drink = %order.drink, state = %at, error = %e, "Order abandoned");
                batch.abandon();
            }
        }

        batch.settle();
    }

    debug!(barista, "Barista stopped");
}
