//! # Floodgate Shared
//! Common functionality shared between the floodgate-server governor and the
//! hosts that embed it: world positions, governor modes, tick-time
//! monitoring, biome traits, update priorities and the fluid engine
//! interface.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod backends;
mod biome;
mod constants;
mod fluid;
mod mode;
mod position;
mod priority;
mod tick_monitor;
mod types;

pub use backends::Instant;
pub use biome::{BiomeId, BiomeProfile, BiomeTraitOracle};
pub use constants::{
    CHUNK_SIZE, CRITICAL_TICK_MS, FLOATING_LAYER_MIN_Y, MAX_PRIORITY, SLOW_TICK_MS,
    TARGET_TICK_MS,
};
pub use fluid::{BlockSnapshot, EngineError, FluidEngine, FluidSnapshot};
pub use mode::{Mode, PerMode};
pub use position::{BlockPos, ChunkKey, PlayerPosition, UpdatePosition};
pub use priority::{compute_priority, PriorityInputs, BASE_PRIORITY};
pub use tick_monitor::{HealthSample, TickMonitor, TICK_SAMPLE_WINDOW};
pub use types::{FluidId, Priority, WorldId};
