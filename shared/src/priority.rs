use crate::{
    biome::BiomeProfile,
    constants::{FLOATING_LAYER_MIN_Y, MAX_PRIORITY},
    fluid::FluidSnapshot,
    position::{BlockPos, PlayerPosition},
    types::Priority,
};

/// Priority every update starts from, and the flat priority used when
/// pressure is disabled
pub const BASE_PRIORITY: Priority = 50;

const SOURCE_BONUS: u32 = 50;
const FLOWING_BONUS_PER_LEVEL: u32 = 2;
const FLOWING_BONUS_MAX: u32 = 20;
const FLOATING_LAYER_BONUS: u32 = 40;
const NEIGHBOR_BONUS: u32 = 3;
const NEAR_PLAYER_RANGE: f64 = 64.0;
const NEAR_PLAYER_BONUS: f64 = 15.0;
const FAR_PLAYER_RANGE: f64 = 128.0;
const FAR_PLAYER_BONUS: u32 = 5;
const INFINITE_SOURCE_BONUS: u32 = 10;

/// Snapshot of everything the priority of one update depends on
#[derive(Clone, Copy, Debug)]
pub struct PriorityInputs<'a> {
    pub pos: &'a BlockPos,
    pub fluid: &'a FluidSnapshot,
    pub below_is_empty: bool,
    /// Orthogonal neighbors that are empty or can take more of this fluid
    pub neighbors_accepting_flow: u8,
    pub biome: &'a BiomeProfile,
    pub players: &'a [PlayerPosition],
    pub pressure_enabled: bool,
}

/// Maps an update to a priority in `0..=MAX_PRIORITY`. Higher runs sooner.
pub fn compute_priority(inputs: &PriorityInputs) -> Priority {
    if !inputs.pressure_enabled {
        return BASE_PRIORITY;
    }

    let mut sum = u32::from(BASE_PRIORITY);

    sum += if inputs.fluid.is_source {
        SOURCE_BONUS
    } else {
        (u32::from(inputs.fluid.amount) * FLOWING_BONUS_PER_LEVEL).min(FLOWING_BONUS_MAX)
    };

    if inputs.pos.y > FLOATING_LAYER_MIN_Y && inputs.below_is_empty {
        sum += FLOATING_LAYER_BONUS;
    }

    sum += u32::from(inputs.neighbors_accepting_flow.min(6)) * NEIGHBOR_BONUS;

    sum += player_proximity_bonus(inputs.pos, inputs.players);

    if inputs.biome.infinite_source {
        sum += INFINITE_SOURCE_BONUS;
    }

    let scaled = (f64::from(sum) * f64::from(inputs.biome.flow_multiplier)).round();
    if scaled.is_nan() || scaled <= 0.0 {
        return 0;
    }
    if scaled >= f64::from(MAX_PRIORITY) {
        return MAX_PRIORITY;
    }
    // in range after the checks above
    scaled as Priority
}

fn player_proximity_bonus(pos: &BlockPos, players: &[PlayerPosition]) -> u32 {
    let Some(dmin) = players
        .iter()
        .map(|player| pos.distance_sq_to(player))
        .min_by(f64::total_cmp)
    else {
        return 0;
    };

    if dmin <= NEAR_PLAYER_RANGE * NEAR_PLAYER_RANGE {
        let bonus = (NEAR_PLAYER_BONUS * (1.0 - dmin.sqrt() / NEAR_PLAYER_RANGE)).floor();
        // bounded to 0..=15 by the range check
        bonus.max(0.0) as u32
    } else if dmin <= FAR_PLAYER_RANGE * FAR_PLAYER_RANGE {
        FAR_PLAYER_BONUS
    } else {
        0
    }
}
