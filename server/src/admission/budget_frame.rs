use std::collections::HashMap;

use floodgate_shared::{ChunkKey, Instant};

/// Admissions charged against the global budget during one server tick.
/// Shared by every world and reset at the pacing world's tick end.
#[derive(Clone, Debug, Default)]
pub struct TickBudget {
    admitted: u32,
    started_at: Option<Instant>,
}

impl TickBudget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self, now: &Instant) {
        self.admitted = 0;
        self.started_at = Some(*now);
    }

    /// Updates admitted across all worlds since the last reset
    pub fn admitted(&self) -> u32 {
        self.admitted
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub(crate) fn record_admission(&mut self) {
        self.admitted += 1;
    }
}

/// Per-chunk admission counters for one world tick
#[derive(Clone, Debug, Default)]
pub struct BudgetFrame {
    admitted_this_tick: u32,
    per_chunk_admitted: HashMap<ChunkKey, u32>,
    last_drained: Option<ChunkKey>,
    started_at: Option<Instant>,
}

impl BudgetFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self, now: &Instant) {
        self.admitted_this_tick = 0;
        self.per_chunk_admitted.clear();
        self.last_drained = None;
        self.started_at = Some(*now);
    }

    /// Updates this world admitted since its last tick end
    pub fn admitted_this_tick(&self) -> u32 {
        self.admitted_this_tick
    }

    pub fn chunk_admitted(&self, chunk: &ChunkKey) -> u32 {
        self.per_chunk_admitted.get(chunk).copied().unwrap_or(0)
    }

    /// Chunks that admitted at least one update this tick, with their counts
    pub fn per_chunk_admitted(&self) -> impl Iterator<Item = (&ChunkKey, &u32)> {
        self.per_chunk_admitted.iter()
    }

    pub fn last_drained(&self) -> Option<ChunkKey> {
        self.last_drained
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub(crate) fn record_admission(&mut self, chunk: ChunkKey) {
        self.admitted_this_tick += 1;
        *self.per_chunk_admitted.entry(chunk).or_insert(0) += 1;
    }

    pub(crate) fn set_last_drained(&mut self, chunk: ChunkKey) {
        self.last_drained = Some(chunk);
    }
}
