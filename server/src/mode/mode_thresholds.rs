use std::time::Duration;

/// A rolling-average tick time and how long it must hold before a mode
/// transition fires
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threshold {
    pub tick_ms: f64,
    pub sustain: Duration,
}

impl Threshold {
    pub const fn new(tick_ms: f64, sustain: Duration) -> Self {
        Self { tick_ms, sustain }
    }
}

/// Tick-time thresholds driving the mode machine
#[derive(Clone, Debug, PartialEq)]
pub struct ModeThresholds {
    /// Normal -> Degraded when the average stays above this
    pub degrade_above: Threshold,
    /// Degraded or Recovery -> Emergency when the average stays above this
    pub emergency_above: Threshold,
    /// Emergency -> Recovery when the average stays below this
    pub recover_below: Threshold,
    /// Degraded -> Normal when the average stays below this
    pub degraded_normal_below: Threshold,
    /// Recovery -> Normal when the average stays below this
    pub recovery_normal_below: Threshold,
}

impl Default for ModeThresholds {
    fn default() -> Self {
        Self {
            degrade_above: Threshold::new(30.0, Duration::from_secs(2)),
            emergency_above: Threshold::new(60.0, Duration::from_secs(1)),
            recover_below: Threshold::new(45.0, Duration::from_secs(5)),
            degraded_normal_below: Threshold::new(20.0, Duration::from_secs(5)),
            recovery_normal_below: Threshold::new(20.0, Duration::from_secs(10)),
        }
    }
}
