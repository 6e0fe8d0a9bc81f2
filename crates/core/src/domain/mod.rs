// Domain Layer - Pure business logic and entities

pub mod error;
pub mod menu;
pub mod order;
pub mod recipe;
pub mod shop;
pub mod stats;

// Re-exports
pub use error::DomainError;
pub use menu::{DrinkType, EquipmentType};
pub use order::{HoldWindow, Order, OrderId, OrderResult, OrderState, StepExecution};
pub use recipe::{Recipe, RecipeCatalog, RecipeStep};
pub use shop::ShopConfig;
pub use stats::MetricsSnapshot;
