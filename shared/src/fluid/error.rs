use thiserror::Error;

use crate::types::WorldId;

/// Errors returned by a [`FluidEngine`](crate::FluidEngine)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A query or reschedule failed but may succeed on a later tick
    #[error("transient engine failure during {operation}: {reason}")]
    Transient {
        operation: &'static str,
        reason: String,
    },

    /// The chunk holding the position is no longer loaded
    #[error("position ({x}, {y}, {z}) in {world} is not loaded")]
    PositionUnloaded {
        world: WorldId,
        x: i32,
        y: i32,
        z: i32,
    },
}

impl EngineError {
    pub fn transient(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Transient {
            operation,
            reason: reason.into(),
        }
    }

    pub fn is_unloaded(&self) -> bool {
        matches!(self, Self::PositionUnloaded { .. })
    }
}
