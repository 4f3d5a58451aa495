use crate::{
    biome::BiomeId,
    fluid::{EngineError, FluidSnapshot},
    position::{BlockPos, PlayerPosition},
    types::{FluidId, WorldId},
};

/// The narrow surface through which the governor reaches the host's fluid
/// simulator. Read methods must be free of side effects.
pub trait FluidEngine {
    /// Returns the fluid at `pos`, or `None` if the block holds no fluid
    fn read_fluid(&self, world: WorldId, pos: &BlockPos)
        -> Result<Option<FluidSnapshot>, EngineError>;

    fn read_block_below_is_empty(&self, world: WorldId, pos: &BlockPos)
        -> Result<bool, EngineError>;

    /// Number of orthogonal neighbors (0..=6) that are empty or hold the
    /// same fluid with room to accept more
    fn neighbors_accepting_flow(&self, world: WorldId, pos: &BlockPos)
        -> Result<u8, EngineError>;

    /// Schedules a fluid tick for `pos` after `delay_ticks`. Must be
    /// idempotent when that fluid tick is already scheduled.
    fn reschedule_fluid_at(
        &mut self,
        world: WorldId,
        pos: &BlockPos,
        fluid: FluidId,
        delay_ticks: u32,
    ) -> Result<(), EngineError>;

    fn is_position_loaded(&self, world: WorldId, pos: &BlockPos) -> bool;

    fn biome_at(&self, world: WorldId, pos: &BlockPos) -> Result<BiomeId, EngineError>;

    fn player_positions(&self, world: WorldId) -> Vec<PlayerPosition>;

    /// Tells the simulator how many fluid updates the governor will admit per
    /// tick in the current mode. Engines without such a knob ignore it.
    fn set_engine_budget(&mut self, _budget: u32) {}
}
