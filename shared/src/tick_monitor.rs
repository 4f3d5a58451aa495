use std::time::Duration;

use log::{debug, warn};

use crate::{
    backends::Instant,
    constants::{CRITICAL_TICK_MS, SLOW_TICK_MS, TARGET_TICK_MS},
};

/// Number of tick durations kept in the rolling window
pub const TICK_SAMPLE_WINDOW: usize = 50;
/// Below this many samples the average reports a healthy tick
const MIN_SAMPLES: usize = 5;

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// One measured tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthSample {
    pub duration_nanos: u64,
    pub measured_at: Instant,
}

impl HealthSample {
    pub fn duration_ms(&self) -> f64 {
        nanos_to_ms(self.duration_nanos)
    }
}

/// Rolling statistics over the last [`TICK_SAMPLE_WINDOW`] tick durations.
/// Recording a sample never allocates.
pub struct TickMonitor {
    samples: [u64; TICK_SAMPLE_WINDOW],
    next_index: usize,
    len: usize,
    window_sum_nanos: u128,
    last_tick_end: Option<Instant>,
    last_sample: Option<HealthSample>,
    total_ticks: u64,
    max_tick_nanos: u64,
    slow_ticks: u64,
    critical_ticks: u64,
}

impl TickMonitor {
    pub fn new() -> Self {
        Self {
            samples: [0; TICK_SAMPLE_WINDOW],
            next_index: 0,
            len: 0,
            window_sum_nanos: 0,
            last_tick_end: None,
            last_sample: None,
            total_ticks: 0,
            max_tick_nanos: 0,
            slow_ticks: 0,
            critical_ticks: 0,
        }
    }

    /// Records the end of a tick. The first call only starts the clock;
    /// every later call yields the duration since the previous one.
    pub fn record_tick_end(&mut self, now: &Instant) -> Option<HealthSample> {
        let previous = self.last_tick_end.replace(*now);
        let previous = previous?;
        Some(self.record_duration(previous.elapsed(now), now))
    }

    /// Records a tick duration measured by the host
    pub fn record_duration(&mut self, duration: Duration, now: &Instant) -> HealthSample {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        if self.len == TICK_SAMPLE_WINDOW {
            self.window_sum_nanos -= u128::from(self.samples[self.next_index]);
        } else {
            self.len += 1;
        }
        self.samples[self.next_index] = nanos;
        self.window_sum_nanos += u128::from(nanos);
        self.next_index = (self.next_index + 1) % TICK_SAMPLE_WINDOW;

        self.total_ticks += 1;
        self.max_tick_nanos = self.max_tick_nanos.max(nanos);

        let sample = HealthSample {
            duration_nanos: nanos,
            measured_at: *now,
        };
        let millis = sample.duration_ms();
        if millis > CRITICAL_TICK_MS {
            self.critical_ticks += 1;
            warn!("critical tick: {:.2}ms", millis);
        } else if millis > SLOW_TICK_MS {
            self.slow_ticks += 1;
            debug!("slow tick: {:.2}ms", millis);
        }

        self.last_sample = Some(sample);
        sample
    }

    /// Forgets when the last tick ended, so the next tick end only restarts
    /// the clock. The rolling window is kept.
    pub fn restart_clock(&mut self) {
        self.last_tick_end = None;
    }

    /// Mean of the window in milliseconds, or a healthy 20ms while the
    /// window holds fewer than five samples
    pub fn avg_tick_ms(&self) -> f64 {
        if self.len < MIN_SAMPLES {
            return TARGET_TICK_MS;
        }
        let len = u128::try_from(self.len).unwrap_or(u128::MAX);
        // the mean of u64 samples fits in a u64
        let mean_nanos = u64::try_from(self.window_sum_nanos / len).unwrap_or(u64::MAX);
        nanos_to_ms(mean_nanos)
    }

    pub fn tps(&self) -> f64 {
        1000.0 / self.avg_tick_ms().max(1.0)
    }

    pub fn sample_count(&self) -> usize {
        self.len
    }

    pub fn last_sample(&self) -> Option<&HealthSample> {
        self.last_sample.as_ref()
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn max_tick_ms(&self) -> f64 {
        nanos_to_ms(self.max_tick_nanos)
    }

    /// Ticks slower than 40ms but not critical
    pub fn slow_ticks(&self) -> u64 {
        self.slow_ticks
    }

    /// Ticks slower than 80ms
    pub fn critical_ticks(&self) -> u64 {
        self.critical_ticks
    }
}

impl Default for TickMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn nanos_to_ms(nanos: u64) -> f64 {
    // precision loss only beyond 2^53 ns
    nanos as f64 / NANOS_PER_MILLI
}
