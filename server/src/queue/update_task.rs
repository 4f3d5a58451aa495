use std::cmp::Reverse;

use floodgate_shared::{BlockPos, ChunkKey, FluidId, Instant, Priority, UpdatePosition};

/// A pending fluid update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateTask {
    pub position: UpdatePosition,
    /// Fluid present when the update was priced
    pub fluid: FluidId,
    pub enqueued_at: Instant,
    pub priority: Priority,
}

impl UpdateTask {
    pub fn new(position: UpdatePosition, fluid: FluidId, priority: Priority, now: &Instant) -> Self {
        Self {
            position,
            fluid,
            enqueued_at: *now,
            priority,
        }
    }

    pub fn pos(&self) -> &BlockPos {
        &self.position.pos
    }

    pub fn chunk(&self) -> ChunkKey {
        self.position.chunk()
    }

    pub fn key(&self) -> TaskKey {
        TaskKey {
            priority: Reverse(self.priority),
            enqueued_at: self.enqueued_at,
            encoded_pos: self.position.pos.as_long(),
            pos: self.position.pos,
        }
    }

    pub fn is_older_than(&self, ttl: std::time::Duration, now: &Instant) -> bool {
        self.enqueued_at.elapsed(now) > ttl
    }
}

/// Orders tasks best first: highest priority, then oldest, then by encoded
/// position
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskKey {
    priority: Reverse<Priority>,
    enqueued_at: Instant,
    encoded_pos: i64,
    // distinct positions never share a key, even if their encodings wrap
    pos: BlockPos,
}

impl TaskKey {
    pub fn priority(&self) -> Priority {
        self.priority.0
    }
}
