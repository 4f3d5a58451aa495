use std::collections::HashMap;

use log::debug;

use crate::{
    biome::{BiomeId, BiomeProfile},
    fluid::FluidEngine,
    position::BlockPos,
    types::WorldId,
};

/// Read-through table from biome to [`BiomeProfile`]
#[derive(Clone, Debug)]
pub struct BiomeTraitOracle {
    profiles: HashMap<BiomeId, BiomeProfile>,
    fallback: BiomeProfile,
}

impl BiomeTraitOracle {
    /// An oracle with no entries: every position gets the fallback profile
    pub fn new() -> Self {
        Self {
            profiles: HashMap::new(),
            fallback: BiomeProfile::fallback(),
        }
    }

    /// An oracle preloaded with profiles for the vanilla water, cave,
    /// nether, frozen, swamp and hill biomes
    pub fn with_builtin_profiles() -> Self {
        let mut oracle = Self::new();
        for (name, flow, radius, infinite, pressure, frequency) in BUILTIN_PROFILES {
            oracle.insert(BiomeProfile::new(
                BiomeId::from_static(name),
                flow,
                radius,
                infinite,
                pressure,
                frequency,
            ));
        }
        oracle
    }

    /// Adds or replaces the profile for `profile.name`, clamping its values
    pub fn insert(&mut self, profile: BiomeProfile) {
        let profile = profile.clamped();
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn set_fallback(&mut self, profile: BiomeProfile) {
        self.fallback = profile.clamped();
    }

    pub fn fallback(&self) -> &BiomeProfile {
        &self.fallback
    }

    pub fn get(&self, biome: &BiomeId) -> &BiomeProfile {
        self.profiles.get(biome).unwrap_or(&self.fallback)
    }

    /// Looks up the biome at a position. A failed lookup yields the fallback
    /// profile.
    pub fn profile_for<E: FluidEngine + ?Sized>(
        &self,
        engine: &E,
        world: WorldId,
        pos: &BlockPos,
    ) -> &BiomeProfile {
        match engine.biome_at(world, pos) {
            Ok(biome) => self.get(&biome),
            Err(err) => {
                debug!("biome lookup failed at {:?} in {}: {}", pos, world, err);
                &self.fallback
            }
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for BiomeTraitOracle {
    fn default() -> Self {
        Self::with_builtin_profiles()
    }
}

// name, flow multiplier, spread radius, infinite source, pressure, update frequency
const BUILTIN_PROFILES: [(&str, f32, u8, bool, bool, f32); 21] = [
    ("ocean", 0.4, 10, true, true, 0.6),
    ("deep_ocean", 0.3, 8, true, true, 0.5),
    ("river", 0.5, 8, true, true, 0.7),
    ("beach", 0.6, 6, false, false, 0.8),
    ("dripstone_caves", 0.8, 4, false, false, 0.9),
    ("lush_caves", 0.7, 5, false, false, 0.8),
    ("deep_dark", 0.6, 6, false, false, 0.8),
    ("nether_wastes", 0.4, 8, false, true, 0.6),
    ("crimson_forest", 0.5, 7, false, true, 0.7),
    ("warped_forest", 0.5, 7, false, true, 0.7),
    ("soul_sand_valley", 0.3, 10, false, true, 0.5),
    ("basalt_deltas", 0.2, 12, false, true, 0.4),
    ("frozen_ocean", 0.2, 12, true, false, 0.3),
    ("frozen_river", 0.3, 10, true, false, 0.4),
    ("snowy_plains", 0.4, 8, false, false, 0.6),
    ("ice_spikes", 0.3, 10, false, false, 0.5),
    ("swamp", 0.6, 6, true, false, 0.8),
    ("mangrove_swamp", 0.6, 6, true, false, 0.8),
    ("windswept_hills", 0.6, 6, false, false, 0.8),
    ("windswept_gravelly_hills", 0.6, 6, false, false, 0.8),
    ("windswept_savanna", 0.7, 5, false, false, 0.8),
];
