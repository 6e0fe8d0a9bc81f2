// Application Layer - Equipment pools, brew orchestration and metrics

pub mod constants;
pub mod equipment;
pub mod metrics;
pub mod orchestrator;
pub mod queue;

// Re-exports
pub use equipment::{EquipmentPool, EquipmentRegistry, Job, PoolError, RegistryError};
pub use metrics::OrderMetrics;
pub use orchestrator::{BrewOrchestrator, BrewOutcome};
pub use queue::{work_queue, WorkQueue};
