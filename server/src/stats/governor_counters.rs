/// Lifetime counters of governor decisions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GovernorCounters {
    /// Updates handed to the engine by a drain or the fast path
    pub admitted: u64,
    /// Updates admitted through the fast path (also counted in `admitted`)
    pub fast_path_admitted: u64,
    /// Fluid ticks allowed to run without prior clearance
    pub fluid_ticks_admitted: u64,
    /// Admission decisions that kept an update for a later tick
    pub deferred: u64,
    /// New positions added to the queue
    pub enqueued: u64,
    /// Candidates merged into an already queued update for the same position
    pub coalesced: u64,
    /// Queued updates removed because their fluid was gone
    pub dropped: u64,
    /// Queued updates evicted by a higher-priority insertion at the chunk cap
    pub evicted: u64,
    /// Old updates whose fluid was still present and that were re-priced
    pub reprioritized: u64,
    /// Failed reschedules and world reads
    pub engine_failures: u64,
    /// Positions blacklisted after repeated reschedule failures
    pub blacklisted: u64,
    /// Updates discarded because their chunk was unloaded
    pub unloaded: u64,
    /// Fluid ticks let through without counting: already cleared or blacklisted
    pub bypassed: u64,
    /// Fluid ticks reported for worlds that never reported a tick end
    pub protocol_errors: u64,
}
