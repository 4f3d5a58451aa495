use std::{
    collections::{HashMap, HashSet, VecDeque},
    time::Duration,
};

use floodgate_shared::{BlockPos, Instant};

/// Counts reschedule failures per position and blacklists positions that
/// keep failing
#[derive(Default)]
pub struct FailureTracker {
    recent: HashMap<BlockPos, VecDeque<Instant>>,
    blacklist: HashSet<BlockPos>,
}

impl FailureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure. Returns true if this failure blacklisted the
    /// position.
    pub fn record_failure(
        &mut self,
        pos: &BlockPos,
        now: &Instant,
        window: Duration,
        limit: u32,
    ) -> bool {
        let failures = self.recent.entry(*pos).or_default();
        failures.push_back(*now);
        while let Some(first) = failures.front() {
            if first.elapsed(now) <= window {
                break;
            }
            failures.pop_front();
        }

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        if failures.len() < limit {
            return false;
        }
        self.recent.remove(pos);
        self.blacklist.insert(*pos)
    }

    /// A success breaks the run of failures
    pub fn record_success(&mut self, pos: &BlockPos) {
        self.recent.remove(pos);
    }

    pub fn is_blacklisted(&self, pos: &BlockPos) -> bool {
        self.blacklist.contains(pos)
    }

    pub fn blacklisted_count(&self) -> usize {
        self.blacklist.len()
    }

    pub fn tracked_count(&self) -> usize {
        self.recent.len()
    }

    /// Forgets positions whose last failure is outside the window
    pub fn prune(&mut self, now: &Instant, window: Duration) {
        self.recent.retain(|_, failures| {
            failures
                .back()
                .is_some_and(|last| last.elapsed(now) <= window)
        });
    }
}
