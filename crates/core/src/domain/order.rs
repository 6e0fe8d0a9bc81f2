// Order Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::menu::{DrinkType, EquipmentType};
use serde::{Deserialize, Serialize};

/// Order ID (caller supplied, positive)
pub type OrderId = i64;

/// Customer order. IDs are not deduplicated; duplicates are processed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub drink: DrinkType,
}

impl Order {
    pub fn new(id: OrderId, drink: DrinkType) -> Self {
        Self { id, drink }
    }
}

/// When a pool worker actually held the equipment for a job (epoch ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

/// Timing of one executed recipe step (epoch ms).
///
/// `start_ms`/`end_ms` bracket the submit call, so they include time spent
/// queued for busy equipment. `held` is the part during which the
/// equipment was occupied; holds on one unit never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepExecution {
    pub equipment: EquipmentType,
    pub start_ms: i64,
    pub end_ms: i64,
    pub held: HoldWindow,
}

impl StepExecution {
    /// A step that never waited: the hold spans the whole step
    pub fn new(equipment: EquipmentType, start_ms: i64, end_ms: i64) -> Self {
        Self {
            equipment,
            start_ms,
            end_ms,
            held: HoldWindow { start_ms, end_ms },
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Time spent waiting for a free unit
    pub fn queued_ms(&self) -> i64 {
        (self.held.start_ms - self.start_ms).max(0)
    }
}

/// Result of a fully completed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub order_id: OrderId,
    pub steps: Vec<StepExecution>,
}

impl OrderResult {
    /// End-to-end latency: last step end minus first step start.
    /// `None` for a result with no steps.
    pub fn latency_ms(&self) -> Option<i64> {
        match (self.steps.first(), self.steps.last()) {
            (Some(first), Some(last)) => Some(last.end_ms - first.start_ms),
            _ => None,
        }
    }
}

/// Order lifecycle inside one batch
///
/// ```text
/// Queued -> InStep(0) -> InStep(1) -> ... -> Completed
///              \-----------\----------------> Abandoned
/// Queued -> Cancelled   (batch cancelled before dequeue)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    Queued,
    InStep(usize),
    Completed,
    Abandoned,
    Cancelled,
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderState::Queued => write!(f, "QUEUED"),
            OrderState::InStep(i) => write!(f, "IN_STEP({})", i),
            OrderState::Completed => write!(f, "COMPLETED"),
            OrderState::Abandoned => write!(f, "ABANDONED"),
            OrderState::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl OrderState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderState::Completed | OrderState::Abandoned | OrderState::Cancelled
        )
    }

    /// Move to the next step (`Queued -> InStep(0)`, `InStep(i) -> InStep(i+1)`)
    pub fn advance(&mut self) -> Result<()> {
        let next = match *self {
            OrderState::Queued => OrderState::InStep(0),
            OrderState::InStep(i) => OrderState::InStep(i + 1),
            _ => return Err(self.invalid("IN_STEP")),
        };
        *self = next;
        Ok(())
    }

    /// Queued (empty recipe) or in-step orders may complete
    pub fn complete(&mut self) -> Result<()> {
        match *self {
            OrderState::Queued | OrderState::InStep(_) => {
                *self = OrderState::Completed;
                Ok(())
            }
            _ => Err(self.invalid("COMPLETED")),
        }
    }

    pub fn abandon(&mut self) -> Result<()> {
        if self.is_terminal() {
            return Err(self.invalid("ABANDONED"));
        }
        *self = OrderState::Abandoned;
        Ok(())
    }

    /// Only orders still waiting in the queue can be cancelled
    pub fn cancel(&mut self) -> Result<()> {
        if *self != OrderState::Queued {
            return Err(self.invalid("CANCELLED"));
        }
        *self = OrderState::Cancelled;
        Ok(())
    }

    fn invalid(&self, to: &str) -> DomainError {
        DomainError::InvalidStateTransition {
            from: self.to_string(),
            to: to.to_string(),
        }
    }
}
