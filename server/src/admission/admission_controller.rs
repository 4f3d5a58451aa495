use floodgate_shared::{ChunkKey, Mode, Priority};

use crate::{
    admission::{BudgetFrame, TickBudget},
    governor::ModeBudgets,
};

/// In emergency mode only updates at or above this priority are admitted
pub const EMERGENCY_PRIORITY_FLOOR: Priority = 90;

/// Decision for one candidate update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Run now; counted against this tick's budgets
    Admitted,
    /// Keep for a later tick
    Deferred,
    /// The update's fluid is gone; forget it
    Dropped,
}

/// Applies the admission rules in order, first match wins:
///
/// 1. emergency mode defers anything below [`EMERGENCY_PRIORITY_FLOOR`]
/// 2. an exhausted global budget (shared by all worlds) defers
/// 3. an exhausted chunk budget defers
/// 4. a genuinely stale update is dropped
/// 5. otherwise the update is counted and admitted
///
/// `is_stale` is only evaluated when rules 1 through 3 pass.
pub fn admit(
    tick: &mut TickBudget,
    frame: &mut BudgetFrame,
    mode: Mode,
    budgets: &ModeBudgets,
    chunk: ChunkKey,
    priority: Priority,
    is_stale: impl FnOnce() -> bool,
) -> Admission {
    if mode == Mode::Emergency && priority < EMERGENCY_PRIORITY_FLOOR {
        return Admission::Deferred;
    }
    if tick.admitted() >= budgets.global_budget {
        return Admission::Deferred;
    }
    if frame.chunk_admitted(&chunk) >= budgets.chunk_budget {
        return Admission::Deferred;
    }
    if is_stale() {
        return Admission::Dropped;
    }
    tick.record_admission();
    frame.record_admission(chunk);
    Admission::Admitted
}
