use std::{sync::OnceLock, time::Duration};

static PROCESS_EPOCH: OnceLock<std::time::Instant> = OnceLock::new();

/// A monotonic point in time, stored as nanoseconds since an epoch.
///
/// Hosts normally use `Instant::now()`, but every governor entry point
/// accepts the time as a parameter so simulated clocks can drive it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Instant {
    nanos: u64,
}

impl Instant {
    /// Creates an Instant from the moment the method is called
    pub fn now() -> Self {
        let epoch = PROCESS_EPOCH.get_or_init(std::time::Instant::now);
        let nanos = u64::try_from(epoch.elapsed().as_nanos()).unwrap_or(u64::MAX);
        Self { nanos }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self {
            nanos: millis.saturating_mul(1_000_000),
        }
    }

    pub fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    pub fn as_millis(&self) -> u64 {
        self.nanos / 1_000_000
    }

    pub fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Returns time elapsed from self until `now`, or zero if `now` is earlier
    pub fn elapsed(&self, now: &Instant) -> Duration {
        Duration::from_nanos(now.nanos.saturating_sub(self.nanos))
    }

    pub fn add_millis(&mut self, millis: u64) {
        self.nanos = self.nanos.saturating_add(millis.saturating_mul(1_000_000));
    }

    pub fn add_duration(&mut self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.nanos = self.nanos.saturating_add(nanos);
    }

    pub fn is_after(&self, other: &Instant) -> bool {
        self.nanos > other.nanos
    }
}
