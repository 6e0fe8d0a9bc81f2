// Equipment Pool - a fixed number of identical equipment units of one type

use super::error::PoolError;
use crate::application::constants::MIN_POOL_WORKERS;
use crate::application::queue::{work_queue, WorkQueue};
use crate::domain::{EquipmentType, HoldWindow, OrderId};
use crate::port::time_provider::SystemTimeProvider;
use crate::port::TimeProvider;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// A unit of work for a pool: occupy the equipment for `duration` on behalf of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub order_id: OrderId,
    pub duration: Duration,
}

impl Job {
    pub fn new(order_id: OrderId, duration: Duration) -> Self {
        Self { order_id, duration }
    }
}

/// A queued job plus the rendezvous back to its submitter
struct JobTicket {
    job: Job,
    done: oneshot::Sender<HoldWindow>,
}

/// Equipment Pool
///
/// `submit` is synchronous per job: the caller waits until a worker has
/// held the equipment for the job's full duration. With N workers and more
/// than N concurrent submitters, the excess wait in arrival order.
pub struct EquipmentPool {
    equipment: EquipmentType,
    worker_count: usize,
    sender: Mutex<Option<mpsc::Sender<JobTicket>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    stop: CancellationToken,
    completed_jobs: Arc<AtomicU64>,
    clock: Arc<dyn TimeProvider>,
}

impl EquipmentPool {
    pub fn new(equipment: EquipmentType, worker_count: usize) -> Self {
        if worker_count < MIN_POOL_WORKERS {
            warn!(
                %equipment,
                requested = worker_count,
                "Equipment pool needs at least one worker, using {}",
                MIN_POOL_WORKERS
            );
        }

        Self {
            equipment,
            worker_count: worker_count.max(MIN_POOL_WORKERS),
            sender: Mutex::new(None),
            workers: Mutex::new(Vec::new()),
            stop: CancellationToken::new(),
            completed_jobs: Arc::new(AtomicU64::new(0)),
            clock: Arc::new(SystemTimeProvider),
        }
    }

    /// Clock used to stamp hold windows
    pub fn with_time_provider(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    pub fn equipment(&self) -> EquipmentType {
        self.equipment
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Jobs held for their full duration since the pool was created
    pub fn completed_jobs(&self) -> u64 {
        self.completed_jobs.load(Ordering::Relaxed)
    }

    pub async fn is_running(&self) -> bool {
        !self.stop.is_cancelled() && self.sender.lock().await.is_some()
    }

    /// Launch the workers. A pool starts once; later calls are ignored.
    pub async fn start(&self) {
        let mut sender = self.sender.lock().await;
        if sender.is_some() || self.stop.is_cancelled() {
            warn!(equipment = %self.equipment, "Equipment pool already started or stopped");
            return;
        }

        let (tx, queue) = work_queue(self.worker_count);
        let mut workers = self.workers.lock().await;
        for worker_id in 0..self.worker_count {
            workers.push(tokio::spawn(run_worker(
                self.equipment,
                worker_id,
                queue.clone(),
                self.stop.clone(),
                self.completed_jobs.clone(),
                self.clock.clone(),
            )));
        }
        *sender = Some(tx);

        debug!(
            equipment = %self.equipment,
            workers = self.worker_count,
            "Equipment pool started"
        );
    }

    /// Run `job` on this equipment and wait for it to finish.
    ///
    /// Returns the window during which a worker held the equipment. Windows
    /// of one worker never overlap, so with a single worker no two jobs'
    /// windows do.
    ///
    /// # Errors
    /// - `PoolError::Stopped` if the pool is not running, or stops before the job finishes
    /// - `PoolError::Cancelled` if `cancel` fires before the job finishes
    pub async fn submit(
        &self,
        job: Job,
        cancel: &CancellationToken,
    ) -> Result<HoldWindow, PoolError> {
        let sender = self
            .sender
            .lock()
            .await
            .clone()
            .ok_or(PoolError::Stopped(self.equipment))?;

        let (done_tx, done_rx) = oneshot::channel();
        let ticket = JobTicket { job, done: done_tx };

        // Wait for a queue slot
        tokio::select! {
            biased;
            _ = self.stop.cancelled() => return Err(PoolError::Stopped(self.equipment)),
            _ = cancel.cancelled() => return Err(PoolError::Cancelled(self.equipment)),
            sent = sender.send(ticket) => {
                sent.map_err(|_| PoolError::Stopped(self.equipment))?;
            }
        }
        drop(sender);

        // Wait for a worker to finish it. `stop` does not cut an accepted job
        // short; a ticket no worker took is dropped with the queue, closing
        // `done_rx`. Dropping `done_rx` on cancel releases the equipment.
        tokio::select! {
            biased;
            done = done_rx => done.map_err(|_| PoolError::Stopped(self.equipment)),
            _ = cancel.cancelled() => Err(PoolError::Cancelled(self.equipment)),
        }
    }

    /// Stop accepting jobs and wait for every worker to exit.
    /// A job already held runs to completion first; queued jobs fail with `Stopped`.
    pub async fn stop(&self) {
        self.stop.cancel();
        self.sender.lock().await.take();

        let workers = std::mem::take(&mut *self.workers.lock().await);
        for handle in workers {
            if let Err(e) = handle.await {
                error!(equipment = %self.equipment, error = ?e, "Equipment worker failed");
            }
        }

        debug!(equipment = %self.equipment, "Equipment pool stopped");
    }
}

async fn run_worker(
    equipment: EquipmentType,
    worker_id: usize,
    queue: WorkQueue<JobTicket>,
    stop: CancellationToken,
    completed_jobs: Arc<AtomicU64>,
    clock: Arc<dyn TimeProvider>,
) {
    debug!(%equipment, worker = worker_id, "Equipment worker started");

    while let Some(mut ticket) = queue.pull(&stop).await {
        let job = ticket.job;

        // Submitter gave up while the job was queued
        if ticket.done.is_closed() {
            debug!(%equipment, worker = worker_id, order_id = job.order_id, "Skipping abandoned job");
            continue;
        }

        debug!(%equipment, worker = worker_id, order_id = job.order_id, duration = ?job.duration, "Job start");

        let start_ms = clock.now_millis();
        let held = tokio::select! {
            _ = sleep(job.duration) => true,
            _ = ticket.done.closed() => false,
        };

        if held {
            completed_jobs.fetch_add(1, Ordering::Relaxed);
            let window = HoldWindow {
                start_ms,
                end_ms: clock.now_millis(),
            };
            let _ = ticket.done.send(window);
            debug!(%equipment, worker = worker_id, order_id = job.order_id, "Job finish");
        } else {
            debug!(%equipment, worker = worker_id, order_id = job.order_id, "Submitter gone, equipment released");
        }
    }

    debug!(%equipment, worker = worker_id, "Equipment worker stopped");
}
