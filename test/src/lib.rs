pub mod helpers;

pub use harness::TestHarness;
pub use helpers::*;
pub use mock_engine::{MockFluidEngine, Reschedule, LAVA, WATER};
