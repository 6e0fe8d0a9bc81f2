// Equipment Registry - one pool per equipment type

use super::error::RegistryError;
use super::pool::EquipmentPool;
use crate::domain::{EquipmentType, ShopConfig};
use crate::port::time_provider::SystemTimeProvider;
use crate::port::TimeProvider;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Equipment Registry
///
/// Registration takes `&mut self`, so it can only happen before the registry
/// is shared (wrapped in an `Arc`). After that, lookups are plain reads of an
/// immutable map and need no locking.
pub struct EquipmentRegistry {
    pools: HashMap<EquipmentType, Arc<EquipmentPool>>,
    time_provider: Arc<dyn TimeProvider>,
}

impl Default for EquipmentRegistry {
    fn default() -> Self {
        Self {
            pools: HashMap::new(),
            time_provider: Arc::new(SystemTimeProvider),
        }
    }
}

impl EquipmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock handed to pools registered after this call
    pub fn with_time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.time_provider = time_provider;
        self
    }

    /// Register one pool per entry of the shop's equipment table
    pub fn from_config(config: &ShopConfig) -> Self {
        let mut registry = Self::new();
        for (equipment, workers) in &config.equipment_workers {
            registry.register(*equipment, *workers);
        }
        registry
    }

    /// Create a pool for `equipment`, replacing any previous one.
    /// Must be called before `start_all`.
    pub fn register(&mut self, equipment: EquipmentType, workers: usize) -> &mut Self {
        let pool = Arc::new(
            EquipmentPool::new(equipment, workers).with_time_provider(self.time_provider.clone()),
        );
        if self.pools.insert(equipment, pool).is_some() {
            debug!(%equipment, workers, "Replaced equipment pool");
        }
        self
    }

    pub fn get_pool(&self, equipment: EquipmentType) -> Result<Arc<EquipmentPool>, RegistryError> {
        self.pools
            .get(&equipment)
            .cloned()
            .ok_or(RegistryError::NotFound(equipment))
    }

    pub fn contains(&self, equipment: EquipmentType) -> bool {
        self.pools.contains_key(&equipment)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// (equipment, worker count) for every registered pool
    pub fn capacity(&self) -> Vec<(EquipmentType, usize)> {
        let mut capacity: Vec<_> = self
            .pools
            .iter()
            .map(|(equipment, pool)| (*equipment, pool.worker_count()))
            .collect();
        capacity.sort();
        capacity
    }

    pub async fn start_all(&self) {
        join_all(self.pools.values().map(|pool| pool.start())).await;
        info!(pools = self.pools.len(), "All equipment pools started");
    }

    /// Stop every pool and wait until all of their workers have exited
    pub async fn stop_all(&self) {
        join_all(self.pools.values().map(|pool| pool.stop())).await;
        info!(pools = self.pools.len(), "All equipment pools stopped");
    }
}
