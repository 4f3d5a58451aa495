use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    time::Duration,
};

use floodgate_shared::{BlockPos, ChunkKey, Instant, PlayerPosition, WorldId};

use crate::{
    admission::BudgetFrame,
    queue::{ChunkBucket, FailureTracker, InsertOutcome, UpdateTask},
};

/// Everything the governor tracks for one world. Dropping it cancels all of
/// the world's pending updates.
pub struct WorldState {
    world: WorldId,
    buckets: BTreeMap<ChunkKey, ChunkBucket>,
    active_chunks: BTreeSet<ChunkKey>,
    pub(crate) frame: BudgetFrame,
    /// Fast-path candidates buffered since the last tick end, in arrival order
    pub(crate) fresh: Vec<UpdateTask>,
    pub(crate) fresh_positions: HashSet<BlockPos>,
    /// Positions rescheduled by the last drain whose fluid tick has not fired
    pub(crate) cleared: HashSet<BlockPos>,
    pub(crate) players: Vec<PlayerPosition>,
    pub(crate) round_robin_cursor: usize,
    pub(crate) failures: FailureTracker,
    pub(crate) last_gc: Instant,
    tick_ends: u64,
    protocol_warned: bool,
}

impl WorldState {
    pub fn new(world: WorldId, players: Vec<PlayerPosition>, now: &Instant) -> Self {
        Self {
            world,
            buckets: BTreeMap::new(),
            active_chunks: BTreeSet::new(),
            frame: BudgetFrame::new(),
            fresh: Vec::new(),
            fresh_positions: HashSet::new(),
            cleared: HashSet::new(),
            players,
            round_robin_cursor: 0,
            failures: FailureTracker::new(),
            last_gc: *now,
            tick_ends: 0,
            protocol_warned: false,
        }
    }

    pub fn world(&self) -> WorldId {
        self.world
    }

    /// Whether the host has reported at least one tick end for this world
    pub fn is_initialized(&self) -> bool {
        self.tick_ends > 0
    }

    pub fn tick_ends(&self) -> u64 {
        self.tick_ends
    }

    pub(crate) fn record_tick_end(&mut self) {
        self.tick_ends += 1;
    }

    /// Returns true the first time it is called
    pub(crate) fn take_protocol_warning(&mut self) -> bool {
        !std::mem::replace(&mut self.protocol_warned, true)
    }

    pub fn frame(&self) -> &BudgetFrame {
        &self.frame
    }

    pub fn players(&self) -> &[PlayerPosition] {
        &self.players
    }

    pub fn failures(&self) -> &FailureTracker {
        &self.failures
    }

    pub fn is_blacklisted(&self, pos: &BlockPos) -> bool {
        self.failures.is_blacklisted(pos)
    }

    pub fn enqueue(&mut self, task: UpdateTask, cap: usize, now: &Instant) -> InsertOutcome {
        let chunk = task.chunk();
        let bucket = self
            .buckets
            .entry(chunk)
            .or_insert_with(|| ChunkBucket::new(chunk, now));
        let outcome = bucket.insert(task, cap, now);
        self.active_chunks.insert(chunk);
        outcome
    }

    /// Puts a task polled this tick back into its bucket unchanged
    pub(crate) fn restore(&mut self, task: UpdateTask, now: &Instant) {
        let chunk = task.chunk();
        self.buckets
            .entry(chunk)
            .or_insert_with(|| ChunkBucket::new(chunk, now))
            .restore(task);
        self.active_chunks.insert(chunk);
    }

    pub fn peek_best(&self, chunk: &ChunkKey) -> Option<&UpdateTask> {
        self.buckets.get(chunk)?.peek_best()
    }

    pub fn poll_best(&mut self, chunk: &ChunkKey, now: &Instant) -> Option<UpdateTask> {
        let task = self.buckets.get_mut(chunk)?.poll_best(now);
        self.refresh_active(chunk);
        task
    }

    pub fn remove(&mut self, pos: &BlockPos) -> Option<UpdateTask> {
        let chunk = pos.chunk();
        let task = self.buckets.get_mut(&chunk)?.remove(pos);
        self.refresh_active(&chunk);
        task
    }

    pub(crate) fn take_older_than(
        &mut self,
        chunk: &ChunkKey,
        ttl: Duration,
        now: &Instant,
    ) -> Vec<UpdateTask> {
        let Some(bucket) = self.buckets.get_mut(chunk) else {
            return Vec::new();
        };
        let taken = bucket.take_older_than(ttl, now);
        self.refresh_active(chunk);
        taken
    }

    pub fn is_queued(&self, pos: &BlockPos) -> bool {
        self.buckets
            .get(&pos.chunk())
            .is_some_and(|bucket| bucket.contains(pos))
    }

    pub fn queued_task(&self, pos: &BlockPos) -> Option<&UpdateTask> {
        self.buckets.get(&pos.chunk())?.get(pos)
    }

    /// Chunks with at least one queued task, in key order
    pub fn active_chunks(&self) -> impl Iterator<Item = &ChunkKey> {
        self.active_chunks.iter()
    }

    pub fn active_chunk_count(&self) -> usize {
        self.active_chunks.len()
    }

    pub fn bucket(&self, chunk: &ChunkKey) -> Option<&ChunkBucket> {
        self.buckets.get(chunk)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn chunk_len(&self, chunk: &ChunkKey) -> usize {
        self.buckets.get(chunk).map_or(0, ChunkBucket::len)
    }

    /// Total queued tasks across all chunks
    pub fn len(&self) -> usize {
        self.active_chunks
            .iter()
            .filter_map(|chunk| self.buckets.get(chunk))
            .map(ChunkBucket::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.active_chunks.is_empty()
    }

    /// Releases empty buckets that have been idle for at least `idle_ttl`.
    /// Returns how many were released.
    pub(crate) fn collect_idle_buckets(&mut self, idle_ttl: Duration, now: &Instant) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| {
            !bucket.is_empty() || bucket.last_activity().elapsed(now) < idle_ttl
        });
        before - self.buckets.len()
    }

    fn refresh_active(&mut self, chunk: &ChunkKey) {
        let non_empty = self
            .buckets
            .get(chunk)
            .is_some_and(|bucket| !bucket.is_empty());
        if non_empty {
            self.active_chunks.insert(*chunk);
        } else {
            self.active_chunks.remove(chunk);
        }
    }
}
