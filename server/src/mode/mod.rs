mod mode_machine;
pub use mode_machine::{ModeMachine, ModeTransition};

mod mode_thresholds;
pub use mode_thresholds::{ModeThresholds, Threshold};
