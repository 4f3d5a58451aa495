use std::{default::Default, time::Duration};

use log::info;

use floodgate_shared::{Mode, PerMode, Priority};

use crate::{error::ConfigError, mode::ModeThresholds};

/// Budgets and limits that apply while the governor is in one mode
#[derive(Clone, Debug, PartialEq)]
pub struct ModeBudgets {
    /// Maximum updates admitted per world tick
    pub global_budget: u32,
    /// Maximum updates admitted per chunk per world tick
    pub chunk_budget: u32,
    /// Number of queued updates per chunk above which the lowest-priority
    /// update is evicted
    pub chunk_queue_cap: usize,
    /// Age after which a queued update is checked against the world
    pub stale_ttl: Duration,
    /// Fresh updates above this priority are admitted at the next tick end
    /// without being queued. `None` disables the fast path.
    pub fast_path_floor: Option<Priority>,
}

/// Contains Config properties which will be used by the Governor
#[derive(Clone, Debug)]
pub struct GovernorConfig {
    /// Budgets for each mode
    pub budgets: PerMode<ModeBudgets>,
    /// Tick-time thresholds for mode transitions
    pub thresholds: ModeThresholds,
    /// When false every update gets the same flat priority
    pub pressure_enabled: bool,
    /// Chunks within this many chunks of a player's chunk are drained first
    pub player_chunk_radius: u32,
    /// Empty chunk buckets idle for this long are released
    pub chunk_idle_ttl: Duration,
    /// How often idle chunk buckets are collected
    pub gc_interval: Duration,
    /// Window in which repeated reschedule failures blacklist a position
    pub failure_window: Duration,
    /// Failures within `failure_window` that blacklist a position
    pub failure_limit: u32,
    /// Priority removed from an update each time its reschedule fails
    pub failure_priority_penalty: Priority,
    /// Total queued updates above which a backlog warning is logged
    pub backlog_warn_threshold: usize,
    /// How often a summary of governor activity is logged
    pub report_interval: Duration,
}

impl GovernorConfig {
    pub fn budgets(&self, mode: Mode) -> &ModeBudgets {
        self.budgets.get(mode)
    }

    /// Checks that every mode can make progress and the thresholds are ordered
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (mode, budgets) in self.budgets.iter() {
            if budgets.global_budget == 0 {
                return Err(ConfigError::ZeroGlobalBudget { mode });
            }
            if budgets.chunk_budget == 0 {
                return Err(ConfigError::ZeroChunkBudget { mode });
            }
            if budgets.chunk_budget > budgets.global_budget {
                return Err(ConfigError::ChunkBudgetExceedsGlobal {
                    mode,
                    chunk_budget: budgets.chunk_budget,
                    global_budget: budgets.global_budget,
                });
            }
            if budgets.chunk_queue_cap == 0 {
                return Err(ConfigError::ZeroQueueCap { mode });
            }
            if budgets.stale_ttl.is_zero() {
                return Err(ConfigError::ZeroStaleTtl { mode });
            }
        }

        let thresholds = &self.thresholds;
        if thresholds.degrade_above.tick_ms >= thresholds.emergency_above.tick_ms {
            return Err(ConfigError::UnorderedThresholds {
                reason: "degrade threshold must be below the emergency threshold",
            });
        }
        if thresholds.recover_below.tick_ms >= thresholds.emergency_above.tick_ms {
            return Err(ConfigError::UnorderedThresholds {
                reason: "recovery threshold must be below the emergency threshold",
            });
        }
        if thresholds.recovery_normal_below.tick_ms >= thresholds.recover_below.tick_ms {
            return Err(ConfigError::UnorderedThresholds {
                reason: "normal threshold must be below the recovery threshold",
            });
        }
        if thresholds.degraded_normal_below.tick_ms >= thresholds.degrade_above.tick_ms {
            return Err(ConfigError::UnorderedThresholds {
                reason: "normal threshold must be below the degrade threshold",
            });
        }

        if self.failure_limit == 0 {
            return Err(ConfigError::ZeroFailureLimit);
        }

        Ok(())
    }

    pub(crate) fn log_summary(&self) {
        for (mode, budgets) in self.budgets.iter() {
            info!(
                "{} mode: global budget {}, chunk budget {}, queue cap {}, stale ttl {:?}, fast path {}",
                mode,
                budgets.global_budget,
                budgets.chunk_budget,
                budgets.chunk_queue_cap,
                budgets.stale_ttl,
                budgets
                    .fast_path_floor
                    .map_or_else(|| "off".to_string(), |floor| format!("above {}", floor)),
            );
        }
        info!(
            "pressure {}, player chunk radius {}",
            if self.pressure_enabled { "enabled" } else { "disabled" },
            self.player_chunk_radius,
        );
    }
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            budgets: PerMode::new(
                ModeBudgets {
                    global_budget: 2000,
                    chunk_budget: 100,
                    chunk_queue_cap: 300,
                    stale_ttl: Duration::from_secs(10),
                    fast_path_floor: Some(80),
                },
                ModeBudgets {
                    global_budget: 800,
                    chunk_budget: 40,
                    chunk_queue_cap: 150,
                    stale_ttl: Duration::from_secs(8),
                    fast_path_floor: None,
                },
                ModeBudgets {
                    global_budget: 100,
                    chunk_budget: 10,
                    chunk_queue_cap: 50,
                    stale_ttl: Duration::from_secs(5),
                    fast_path_floor: None,
                },
                ModeBudgets {
                    global_budget: 1400,
                    chunk_budget: 70,
                    chunk_queue_cap: 200,
                    stale_ttl: Duration::from_secs(10),
                    fast_path_floor: Some(120),
                },
            ),
            thresholds: ModeThresholds::default(),
            pressure_enabled: true,
            player_chunk_radius: 2,
            chunk_idle_ttl: Duration::from_secs(60),
            gc_interval: Duration::from_secs(10),
            failure_window: Duration::from_secs(60),
            failure_limit: 3,
            failure_priority_penalty: 5,
            backlog_warn_threshold: 5000,
            report_interval: Duration::from_secs(60),
        }
    }
}
