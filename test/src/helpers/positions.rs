use floodgate_shared::{BlockPos, ChunkKey, FluidSnapshot, WorldId, CHUNK_SIZE};

use crate::mock_engine::{MockFluidEngine, WATER};

/// The `index`-th distinct block of a chunk, filling columns first and
/// stacking layers upward from y = 64
pub fn pos_in_chunk(chunk: ChunkKey, index: usize) -> BlockPos {
    let columns = (CHUNK_SIZE * CHUNK_SIZE) as usize;
    let column = index % columns;
    let layer = index / columns;
    let offset_x = (column % CHUNK_SIZE as usize) as i32;
    let offset_z = (column / CHUNK_SIZE as usize) as i32;
    BlockPos::new(
        chunk.x * CHUNK_SIZE + offset_x,
        64 + layer as i32,
        chunk.z * CHUNK_SIZE + offset_z,
    )
}

/// Places flowing water with the given level at `pos`
pub fn water_at(engine: &mut MockFluidEngine, world: WorldId, pos: BlockPos, amount: u8) {
    engine.set_fluid(world, pos, FluidSnapshot::flowing(WATER, amount));
}

/// Places `count` flowing water blocks in `chunk` and returns their positions
pub fn fill_chunk(engine: &mut MockFluidEngine, world: WorldId, chunk: ChunkKey, count: usize) -> Vec<BlockPos> {
    (0..count)
        .map(|index| {
            let pos = pos_in_chunk(chunk, index);
            water_at(engine, world, pos, 4);
            pos
        })
        .collect()
}
