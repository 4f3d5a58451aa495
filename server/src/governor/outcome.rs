/// What the governor did with a neighbor notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Buffered for fast-path admission at the world's next tick end
    FastPath,
    /// Added to the deferred queue
    Queued,
    /// Merged into an update already pending for the position
    Coalesced,
    /// Nothing to do: no fluid at the position, or its chunk is not loaded
    Ignored,
    /// The position could not be read; the notification was dropped
    Failed,
}

/// Answer to a fluid tick that is about to run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShouldProceed {
    /// Run the per-block work now
    Proceed,
    /// Skip it; the governor will reschedule the position
    Defer,
}

impl ShouldProceed {
    pub fn is_proceed(&self) -> bool {
        matches!(self, ShouldProceed::Proceed)
    }
}
