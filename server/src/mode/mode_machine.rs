use log::info;

use floodgate_shared::{Instant, Mode};

use crate::mode::{ModeThresholds, Threshold};

/// A completed mode change
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeTransition {
    pub from: Mode,
    pub to: Mode,
    pub at: Instant,
    pub avg_tick_ms: f64,
}

#[derive(Clone, Copy)]
enum Direction {
    Above,
    Below,
}

#[derive(Clone, Copy)]
struct Edge {
    to: Mode,
    direction: Direction,
    threshold: Threshold,
}

impl Edge {
    fn holds(&self, avg_tick_ms: f64) -> bool {
        match self.direction {
            Direction::Above => avg_tick_ms > self.threshold.tick_ms,
            Direction::Below => avg_tick_ms < self.threshold.tick_ms,
        }
    }
}

/// Outgoing edges of each mode. Emergency only leaves through Recovery.
fn edges(mode: Mode, thresholds: &ModeThresholds) -> [Option<Edge>; 2] {
    let above = |to, threshold| Some(Edge { to, direction: Direction::Above, threshold });
    let below = |to, threshold| Some(Edge { to, direction: Direction::Below, threshold });
    match mode {
        Mode::Normal => [above(Mode::Degraded, thresholds.degrade_above), None],
        Mode::Degraded => [
            above(Mode::Emergency, thresholds.emergency_above),
            below(Mode::Normal, thresholds.degraded_normal_below),
        ],
        Mode::Emergency => [below(Mode::Recovery, thresholds.recover_below), None],
        Mode::Recovery => [
            above(Mode::Emergency, thresholds.emergency_above),
            below(Mode::Normal, thresholds.recovery_normal_below),
        ],
    }
}

/// Owns the governor [`Mode`]. A transition fires once its condition has
/// held continuously for the edge's sustain time; any sample that breaks
/// the condition restarts that edge's window.
pub struct ModeMachine {
    mode: Mode,
    condition_since: [Option<Instant>; 2],
    last_transition: Option<ModeTransition>,
    transition_count: u64,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            condition_since: [None; 2],
            last_transition: None,
            transition_count: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn last_transition(&self) -> Option<&ModeTransition> {
        self.last_transition.as_ref()
    }

    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    /// Feeds the current rolling average. Returns the transition if one fired.
    pub fn evaluate(
        &mut self,
        avg_tick_ms: f64,
        thresholds: &ModeThresholds,
        now: &Instant,
    ) -> Option<ModeTransition> {
        let mut fired = None;

        for (slot, edge) in edges(self.mode, thresholds).into_iter().enumerate() {
            let Some(edge) = edge else {
                self.condition_since[slot] = None;
                continue;
            };
            if !edge.holds(avg_tick_ms) {
                self.condition_since[slot] = None;
                continue;
            }
            let since = *self.condition_since[slot].get_or_insert(*now);
            if fired.is_none() && since.elapsed(now) >= edge.threshold.sustain {
                fired = Some(edge.to);
            }
        }

        let to = fired?;
        let transition = ModeTransition {
            from: self.mode,
            to,
            at: *now,
            avg_tick_ms,
        };
        info!(
            "governor mode {} -> {} (avg tick {:.2}ms)",
            transition.from, transition.to, avg_tick_ms
        );
        self.mode = to;
        self.condition_since = [None; 2];
        self.last_transition = Some(transition);
        self.transition_count += 1;
        Some(transition)
    }
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}
