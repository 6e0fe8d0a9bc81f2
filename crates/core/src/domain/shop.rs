// Shop Configuration - equipment capacity and menu, injected at startup

use crate::domain::menu::EquipmentType;
use crate::domain::recipe::RecipeCatalog;
use std::collections::BTreeMap;

/// Default capacity of the latency sample window
pub const DEFAULT_METRICS_WINDOW: usize = 1024;

/// Shop configuration
///
/// Everything the engine needs to know about the physical shop: how many
/// units of each equipment type exist and which recipes are on the menu.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub equipment_workers: BTreeMap<EquipmentType, usize>,
    pub catalog: RecipeCatalog,
    pub metrics_window: usize,
}

impl Default for ShopConfig {
    fn default() -> Self {
        let equipment_workers = BTreeMap::from([
            (EquipmentType::EspressoMachine, 2),
            (EquipmentType::Grinder, 1),
            (EquipmentType::MilkSteamer, 1),
            (EquipmentType::Blender, 1),
            (EquipmentType::Whisk, 2),
        ]);

        Self {
            equipment_workers,
            catalog: RecipeCatalog::standard(),
            metrics_window: DEFAULT_METRICS_WINDOW,
        }
    }
}

impl ShopConfig {
    /// Standard menu with `workers` units of every equipment type
    pub fn uniform(workers: usize) -> Self {
        Self {
            equipment_workers: EquipmentType::ALL.iter().map(|e| (*e, workers)).collect(),
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, equipment: EquipmentType, workers: usize) -> Self {
        self.equipment_workers.insert(equipment, workers);
        self
    }

    pub fn without_equipment(mut self, equipment: EquipmentType) -> Self {
        self.equipment_workers.remove(&equipment);
        self
    }

    pub fn with_catalog(mut self, catalog: RecipeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_metrics_window(mut self, window: usize) -> Self {
        self.metrics_window = window;
        self
    }
}
