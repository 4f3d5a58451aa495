use floodgate_shared::{
    compute_priority, BiomeTraitOracle, BlockPos, BlockSnapshot, EngineError, FluidEngine,
    FluidSnapshot, PlayerPosition, Priority, PriorityInputs, WorldId, BASE_PRIORITY,
};

/// Prices an update from a snapshot. Block facts missing from `block` are
/// read through the engine; nothing is read when pressure is disabled.
#[allow(clippy::too_many_arguments)]
pub(crate) fn price_update<E: FluidEngine + ?Sized>(
    engine: &E,
    oracle: &BiomeTraitOracle,
    pressure_enabled: bool,
    world: WorldId,
    pos: &BlockPos,
    fluid: &FluidSnapshot,
    block: &BlockSnapshot,
    players: &[PlayerPosition],
) -> Result<Priority, EngineError> {
    if !pressure_enabled {
        return Ok(BASE_PRIORITY);
    }

    let below_is_empty = match block.below_is_empty {
        Some(below_is_empty) => below_is_empty,
        None => engine.read_block_below_is_empty(world, pos)?,
    };
    let neighbors_accepting_flow = match block.neighbors_accepting_flow {
        Some(count) => count,
        None => engine.neighbors_accepting_flow(world, pos)?,
    };
    let biome = oracle.profile_for(engine, world, pos);

    Ok(compute_priority(&PriorityInputs {
        pos,
        fluid,
        below_is_empty,
        neighbors_accepting_flow,
        biome,
        players,
        pressure_enabled,
    }))
}
