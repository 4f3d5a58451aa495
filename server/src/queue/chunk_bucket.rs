use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    time::Duration,
};

use floodgate_shared::{BlockPos, ChunkKey, Instant};

use crate::queue::{TaskKey, UpdateTask};

/// Result of inserting a task into a [`ChunkBucket`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The bucket was at its cap and this strictly lower-priority task was
    /// evicted to make room
    Evicted(UpdateTask),
    /// An already queued task for the position was replaced by the higher
    /// priority incoming task
    Replaced,
    /// The position was already queued with at least this priority
    Coalesced,
}

/// Pending updates of one chunk, polled highest priority first.
/// Holds at most one task per block position.
pub struct ChunkBucket {
    chunk: ChunkKey,
    tasks: BTreeMap<TaskKey, UpdateTask>,
    by_pos: HashMap<BlockPos, TaskKey>,
    by_age: BTreeSet<(Instant, BlockPos)>,
    last_activity: Instant,
}

impl ChunkBucket {
    pub fn new(chunk: ChunkKey, now: &Instant) -> Self {
        Self {
            chunk,
            tasks: BTreeMap::new(),
            by_pos: HashMap::new(),
            by_age: BTreeSet::new(),
            last_activity: *now,
        }
    }

    pub fn chunk(&self) -> ChunkKey {
        self.chunk
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn contains(&self, pos: &BlockPos) -> bool {
        self.by_pos.contains_key(pos)
    }

    pub fn get(&self, pos: &BlockPos) -> Option<&UpdateTask> {
        let key = self.by_pos.get(pos)?;
        self.tasks.get(key)
    }

    /// Inserts a task, enforcing one task per position and the soft `cap`.
    ///
    /// At the cap, the current lowest-priority task is evicted only if its
    /// priority is strictly below the incoming task's; otherwise the bucket
    /// grows past the cap so that no equal-priority task is ever lost.
    pub fn insert(&mut self, task: UpdateTask, cap: usize, now: &Instant) -> InsertOutcome {
        self.last_activity = *now;
        let pos = *task.pos();

        if let Some(existing_key) = self.by_pos.get(&pos).copied() {
            if task.priority <= existing_key.priority() {
                return InsertOutcome::Coalesced;
            }
            self.remove_key(&existing_key);
            self.put(task);
            return InsertOutcome::Replaced;
        }

        let mut outcome = InsertOutcome::Inserted;
        if self.tasks.len() >= cap {
            let worst_is_lower = self
                .peek_worst()
                .is_some_and(|worst| worst.priority < task.priority);
            if worst_is_lower {
                if let Some((_, evicted)) = self.tasks.pop_last() {
                    self.by_pos.remove(evicted.pos());
                    self.by_age.remove(&(evicted.enqueued_at, *evicted.pos()));
                    outcome = InsertOutcome::Evicted(evicted);
                }
            }
        }

        self.put(task);
        outcome
    }

    /// Puts back a task that was polled this tick, with its original key
    pub fn restore(&mut self, task: UpdateTask) {
        if let Some(existing_key) = self.by_pos.get(task.pos()).copied() {
            if task.priority <= existing_key.priority() {
                return;
            }
            self.remove_key(&existing_key);
        }
        self.put(task);
    }

    pub fn peek_best(&self) -> Option<&UpdateTask> {
        self.tasks.first_key_value().map(|(_, task)| task)
    }

    pub fn peek_worst(&self) -> Option<&UpdateTask> {
        self.tasks.last_key_value().map(|(_, task)| task)
    }

    pub fn poll_best(&mut self, now: &Instant) -> Option<UpdateTask> {
        let (_, task) = self.tasks.pop_first()?;
        self.by_pos.remove(task.pos());
        self.by_age.remove(&(task.enqueued_at, *task.pos()));
        self.last_activity = *now;
        Some(task)
    }

    pub fn remove(&mut self, pos: &BlockPos) -> Option<UpdateTask> {
        let key = self.by_pos.get(pos).copied()?;
        self.remove_key(&key)
    }

    /// Removes and returns every task queued for longer than `ttl`, oldest
    /// first
    pub fn take_older_than(&mut self, ttl: Duration, now: &Instant) -> Vec<UpdateTask> {
        let mut taken = Vec::new();
        while let Some(&(enqueued_at, pos)) = self.by_age.first() {
            if enqueued_at.elapsed(now) <= ttl {
                break;
            }
            if let Some(task) = self.remove(&pos) {
                taken.push(task);
            } else {
                self.by_age.pop_first();
            }
        }
        taken
    }

    pub fn oldest_enqueued_at(&self) -> Option<Instant> {
        self.by_age.first().map(|(enqueued_at, _)| *enqueued_at)
    }

    /// Tasks in poll order
    pub fn iter(&self) -> impl Iterator<Item = &UpdateTask> {
        self.tasks.values()
    }

    fn put(&mut self, task: UpdateTask) {
        let key = task.key();
        self.by_pos.insert(*task.pos(), key);
        self.by_age.insert((task.enqueued_at, *task.pos()));
        self.tasks.insert(key, task);
    }

    fn remove_key(&mut self, key: &TaskKey) -> Option<UpdateTask> {
        let task = self.tasks.remove(key)?;
        self.by_pos.remove(task.pos());
        self.by_age.remove(&(task.enqueued_at, *task.pos()));
        Some(task)
    }
}
