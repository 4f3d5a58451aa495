//! # Floodgate Server
//! An adaptive, tick-budgeted governor for finite-fluid simulations. It
//! measures server tick health, prices pending fluid updates, admits them
//! within per-tick global and per-chunk budgets with a bias toward chunks
//! near players, and defers the rest into a queue that drains on later
//! ticks.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use floodgate_shared::{
        compute_priority, BiomeId, BiomeProfile, BiomeTraitOracle, BlockPos, BlockSnapshot,
        ChunkKey, EngineError, FluidEngine, FluidId, FluidSnapshot, HealthSample, Instant, Mode,
        PerMode, PlayerPosition, Priority, PriorityInputs, TickMonitor, UpdatePosition, WorldId,
    };
}

mod admission;
mod error;
mod governor;
mod mode;
mod queue;
mod scheduler;
mod stats;

pub use admission::{
    admit, chunk_order, Admission, BudgetFrame, ChunkOrder, TickBudget, EMERGENCY_PRIORITY_FLOOR,
};
pub use error::ConfigError;
pub use governor::{Governor, GovernorConfig, ModeBudgets, NotifyOutcome, ShouldProceed};
pub use mode::{ModeMachine, ModeThresholds, ModeTransition, Threshold};
pub use queue::{
    ChunkBucket, DeferredQueue, FailureTracker, InsertOutcome, TaskKey, UpdateTask, WorldState,
};
pub use scheduler::DrainReport;
pub use stats::{GovernorCounters, GovernorStats, StatsHandle, WorldStats};
