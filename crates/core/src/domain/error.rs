// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid order state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("No recipe for drink: {0}")]
    UnknownRecipe(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
