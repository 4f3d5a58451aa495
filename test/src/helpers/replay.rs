use floodgate_shared::{BlockPos, ChunkKey, FluidSnapshot, PlayerPosition, WorldId};

use crate::{
    harness::TestHarness,
    mock_engine::{LAVA, WATER},
};

use super::pos_in_chunk;

/// One host-side event in a recorded fluid workload
#[derive(Clone, Debug, PartialEq)]
pub enum ReplayEvent {
    PlaceFluid {
        world: WorldId,
        pos: BlockPos,
        fluid: FluidSnapshot,
    },
    RemoveFluid {
        world: WorldId,
        pos: BlockPos,
    },
    MovePlayer {
        world: WorldId,
        player: PlayerPosition,
    },
    Notify {
        world: WorldId,
        pos: BlockPos,
    },
    FluidTick {
        world: WorldId,
        pos: BlockPos,
        fluid: FluidSnapshot,
    },
    TickEnd {
        world: WorldId,
        tick_ms: u64,
    },
}

/// Generates a reproducible workload over two worlds and a handful of chunks
pub fn random_workload(seed: u64, len: usize) -> Vec<ReplayEvent> {
    let rng = fastrand::Rng::with_seed(seed);
    let worlds = [WorldId::new(0), WorldId::new(1)];
    let mut events = Vec::with_capacity(len);

    for _ in 0..len {
        let world = worlds[rng.usize(..worlds.len())];
        let chunk = ChunkKey::new(rng.i32(-3..3), rng.i32(-3..3));
        let pos = pos_in_chunk(chunk, rng.usize(..512));
        let fluid = if rng.u8(..8) == 0 {
            FluidSnapshot::source(if rng.bool() { WATER } else { LAVA })
        } else {
            FluidSnapshot::flowing(WATER, rng.u8(1..8))
        };

        let event = match rng.u8(..100) {
            0..=34 => ReplayEvent::PlaceFluid { world, pos, fluid },
            35..=39 => ReplayEvent::RemoveFluid { world, pos },
            40..=41 => ReplayEvent::MovePlayer {
                world,
                player: PlayerPosition::new(
                    rng.f64() * 96.0 - 48.0,
                    64.0,
                    rng.f64() * 96.0 - 48.0,
                ),
            },
            42..=79 => ReplayEvent::Notify { world, pos },
            80..=91 => ReplayEvent::FluidTick { world, pos, fluid },
            _ => ReplayEvent::TickEnd {
                world,
                tick_ms: rng.u64(10..120),
            },
        };
        events.push(event);
    }

    events
}

/// Feeds a workload through the harness in order
pub fn replay(harness: &mut TestHarness, events: &[ReplayEvent]) {
    for event in events {
        match event {
            ReplayEvent::PlaceFluid { world, pos, fluid } => {
                harness.engine_mut().set_fluid(*world, *pos, *fluid);
            }
            ReplayEvent::RemoveFluid { world, pos } => {
                harness.engine_mut().remove_fluid(*world, pos);
            }
            ReplayEvent::MovePlayer { world, player } => {
                harness.engine_mut().set_players(*world, vec![*player]);
            }
            ReplayEvent::Notify { world, pos } => {
                harness.notify(*world, *pos);
            }
            ReplayEvent::FluidTick { world, pos, fluid } => {
                harness.fluid_tick(*world, *pos, *fluid);
            }
            ReplayEvent::TickEnd { world, tick_ms } => {
                harness.end_tick_after(*world, *tick_ms);
            }
        }
    }
}
