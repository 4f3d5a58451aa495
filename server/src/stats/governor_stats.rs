use std::sync::Arc;

use arc_swap::ArcSwap;

use floodgate_shared::{Instant, Mode, WorldId};

use crate::{mode::ModeTransition, stats::GovernorCounters};

/// Immutable snapshot of governor state, published at every world tick end
#[derive(Clone, Debug, Default)]
pub struct GovernorStats {
    pub mode: Mode,
    pub avg_tick_ms: f64,
    pub tps: f64,
    pub total_ticks: u64,
    pub max_tick_ms: f64,
    pub slow_ticks: u64,
    pub critical_ticks: u64,
    pub counters: GovernorCounters,
    /// Global admissions in the current server tick, across all worlds
    pub tick_admitted: u32,
    pub queued: usize,
    pub worlds: Vec<WorldStats>,
    pub last_transition: Option<ModeTransition>,
    pub transition_count: u64,
    pub published_at: Option<Instant>,
}

impl GovernorStats {
    pub fn world(&self, world: &WorldId) -> Option<&WorldStats> {
        self.worlds.iter().find(|stats| stats.world == *world)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldStats {
    pub world: WorldId,
    pub queued: usize,
    pub active_chunks: usize,
    pub buckets: usize,
    pub admitted_this_tick: u32,
    pub blacklisted: usize,
}

/// Cloneable reader of the latest [`GovernorStats`]. Safe to use from any
/// thread; reads never block the tick thread.
#[derive(Clone)]
pub struct StatsHandle {
    shared: Arc<ArcSwap<GovernorStats>>,
}

impl StatsHandle {
    pub fn load(&self) -> Arc<GovernorStats> {
        self.shared.load_full()
    }

    pub fn mode(&self) -> Mode {
        self.shared.load().mode
    }
}

pub(crate) struct StatsPublisher {
    shared: Arc<ArcSwap<GovernorStats>>,
}

impl StatsPublisher {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(ArcSwap::from_pointee(GovernorStats::default())),
        }
    }

    pub fn handle(&self) -> StatsHandle {
        StatsHandle {
            shared: self.shared.clone(),
        }
    }

    pub fn publish(&self, stats: GovernorStats) {
        self.shared.store(Arc::new(stats));
    }

    pub fn latest(&self) -> Arc<GovernorStats> {
        self.shared.load_full()
    }
}
