// Recipe Catalog - drink type -> ordered equipment steps

use crate::domain::menu::{DrinkType, EquipmentType};
use std::collections::HashMap;
use std::time::Duration;

/// One step of a recipe: occupy `equipment` for `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeStep {
    pub equipment: EquipmentType,
    pub duration: Duration,
}

impl RecipeStep {
    pub const fn new(equipment: EquipmentType, duration: Duration) -> Self {
        Self {
            equipment,
            duration,
        }
    }
}

/// Ordered steps required to produce a drink. Order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipe {
    steps: Vec<RecipeStep>,
}

impl Recipe {
    pub fn new(steps: Vec<RecipeStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[RecipeStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of nominal step durations; a lower bound on end-to-end latency
    pub fn nominal_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Equipment types this recipe touches, in step order (may repeat)
    pub fn equipment(&self) -> impl Iterator<Item = EquipmentType> + '_ {
        self.steps.iter().map(|s| s.equipment)
    }
}

impl From<Vec<RecipeStep>> for Recipe {
    fn from(steps: Vec<RecipeStep>) -> Self {
        Self::new(steps)
    }
}

/// Recipe Catalog
///
/// Static after construction. `standard()` reproduces the reference menu;
/// custom catalogs are built with `insert` and injected through `ShopConfig`.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: HashMap<DrinkType, Recipe>,
}

impl RecipeCatalog {
    /// Empty catalog (every lookup misses)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reference menu
    pub fn standard() -> Self {
        use EquipmentType::*;
        let ms = Duration::from_millis;

        let mut catalog = Self::empty();
        catalog.insert(
            DrinkType::Espresso,
            vec![
                RecipeStep::new(Grinder, ms(5)),
                RecipeStep::new(EspressoMachine, ms(8)),
            ],
        );
        catalog.insert(
            DrinkType::Latte,
            vec![
                RecipeStep::new(Grinder, ms(5)),
                RecipeStep::new(EspressoMachine, ms(8)),
                RecipeStep::new(MilkSteamer, ms(15)),
            ],
        );
        catalog.insert(
            DrinkType::Frappe,
            vec![
                RecipeStep::new(Grinder, ms(5)),
                RecipeStep::new(Blender, ms(12)),
            ],
        );
        catalog.insert(
            DrinkType::Matcha,
            vec![
                RecipeStep::new(Grinder, ms(5)),
                RecipeStep::new(MilkSteamer, ms(15)),
                RecipeStep::new(Whisk, ms(3)),
            ],
        );
        catalog
    }

    /// Insert or replace the recipe for a drink
    pub fn insert(&mut self, drink: DrinkType, recipe: impl Into<Recipe>) -> &mut Self {
        self.recipes.insert(drink, recipe.into());
        self
    }

    pub fn get(&self, drink: DrinkType) -> Option<&Recipe> {
        self.recipes.get(&drink)
    }

    pub fn contains(&self, drink: DrinkType) -> bool {
        self.recipes.contains_key(&drink)
    }

    pub fn drinks(&self) -> impl Iterator<Item = DrinkType> + '_ {
        self.recipes.keys().copied()
    }
}
