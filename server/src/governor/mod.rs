mod governor;
pub use governor::Governor;

mod governor_config;
pub use governor_config::{GovernorConfig, ModeBudgets};

mod outcome;
pub use outcome::{NotifyOutcome, ShouldProceed};
