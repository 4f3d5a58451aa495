use std::collections::BTreeMap;

use floodgate_shared::{Instant, PlayerPosition, WorldId};

use crate::queue::WorldState;

/// Per-world pending updates. Worlds iterate in id order.
#[derive(Default)]
pub struct DeferredQueue {
    worlds: BTreeMap<WorldId, WorldState>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self, world: &WorldId) -> Option<&WorldState> {
        self.worlds.get(world)
    }

    pub fn world_mut(&mut self, world: &WorldId) -> Option<&mut WorldState> {
        self.worlds.get_mut(world)
    }

    /// Returns the world's state, creating it with `players` if absent
    pub fn world_or_insert_with(
        &mut self,
        world: WorldId,
        players: impl FnOnce() -> Vec<PlayerPosition>,
        now: &Instant,
    ) -> &mut WorldState {
        self.worlds
            .entry(world)
            .or_insert_with(|| WorldState::new(world, players(), now))
    }

    pub fn remove_world(&mut self, world: &WorldId) -> Option<WorldState> {
        self.worlds.remove(world)
    }

    pub fn worlds(&self) -> impl Iterator<Item = &WorldState> {
        self.worlds.values()
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// Total queued tasks across all worlds
    pub fn len(&self) -> usize {
        self.worlds.values().map(WorldState::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.values().all(WorldState::is_empty)
    }
}
