// Equipment Error Types

use crate::domain::EquipmentType;
use thiserror::Error;

/// Why a job submission did not complete
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("{0} pool is stopped")]
    Stopped(EquipmentType),

    #[error("submission to {0} pool was cancelled")]
    Cancelled(EquipmentType),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no equipment pool registered for {0}")]
    NotFound(EquipmentType),
}
