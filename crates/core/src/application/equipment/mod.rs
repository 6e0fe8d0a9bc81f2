// Equipment - capacity-bounded resource pools and their registry

mod error;
mod pool;
mod registry;

pub use error::{PoolError, RegistryError};
pub use pool::{EquipmentPool, Job};
pub use registry::EquipmentRegistry;
