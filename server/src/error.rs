use thiserror::Error;

use floodgate_shared::Mode;

/// Reasons a [`GovernorConfig`](crate::GovernorConfig) is rejected
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("global budget for {mode} mode must be greater than zero")]
    ZeroGlobalBudget { mode: Mode },

    #[error("chunk budget for {mode} mode must be greater than zero")]
    ZeroChunkBudget { mode: Mode },

    #[error("chunk budget {chunk_budget} for {mode} mode exceeds its global budget {global_budget}")]
    ChunkBudgetExceedsGlobal {
        mode: Mode,
        chunk_budget: u32,
        global_budget: u32,
    },

    #[error("chunk queue cap for {mode} mode must be greater than zero")]
    ZeroQueueCap { mode: Mode },

    #[error("stale ttl for {mode} mode must be greater than zero")]
    ZeroStaleTtl { mode: Mode },

    #[error("mode thresholds are not ordered: {reason}")]
    UnorderedThresholds { reason: &'static str },

    #[error("failure limit must be greater than zero")]
    ZeroFailureLimit,
}
