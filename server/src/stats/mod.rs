mod governor_counters;
pub use governor_counters::GovernorCounters;

mod governor_stats;
pub use governor_stats::{GovernorStats, StatsHandle, WorldStats};
pub(crate) use governor_stats::StatsPublisher;
