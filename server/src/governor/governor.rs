use std::sync::Arc;

use log::{debug, info, warn};

use floodgate_shared::{
    BiomeTraitOracle, BlockPos, BlockSnapshot, FluidEngine, FluidSnapshot, Instant, Mode,
    TickMonitor, UpdatePosition, WorldId, BASE_PRIORITY,
};

use crate::{
    admission::{admit, Admission, TickBudget},
    error::ConfigError,
    governor::{GovernorConfig, NotifyOutcome, ShouldProceed},
    mode::ModeMachine,
    queue::{DeferredQueue, InsertOutcome, UpdateTask, WorldState},
    scheduler::{enqueue_task, price_update, DrainReport, Scheduler},
    stats::{GovernorCounters, GovernorStats, StatsHandle, StatsPublisher, WorldStats},
};

/// Decides, for every candidate fluid update, whether it runs this tick,
/// runs later or is forgotten, keeping the server's tick time bounded.
///
/// All entry points are called from the host's tick thread and never fail;
/// observers on other threads read [`GovernorStats`] through a
/// [`StatsHandle`].
pub struct Governor<E: FluidEngine> {
    config: GovernorConfig,
    engine: E,
    oracle: BiomeTraitOracle,
    monitor: TickMonitor,
    mode_machine: ModeMachine,
    queue: DeferredQueue,
    /// The world whose tick ends feed the tick monitor and start a new
    /// server tick
    pacing_world: Option<WorldId>,
    /// Global admissions of the current server tick, shared by all worlds
    tick_budget: TickBudget,
    counters: GovernorCounters,
    stats: StatsPublisher,
    last_report: Option<Instant>,
    last_backlog_warning: Option<Instant>,
}

impl<E: FluidEngine> Governor<E> {
    /// Create a new Governor with the builtin biome profiles
    pub fn new(config: GovernorConfig, engine: E) -> Result<Self, ConfigError> {
        Self::with_oracle(config, engine, BiomeTraitOracle::with_builtin_profiles())
    }

    pub fn with_oracle(
        config: GovernorConfig,
        engine: E,
        oracle: BiomeTraitOracle,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "fluid governor starting with {} biome profiles",
            oracle.len()
        );
        config.log_summary();

        Ok(Self {
            config,
            engine,
            oracle,
            monitor: TickMonitor::new(),
            mode_machine: ModeMachine::new(),
            queue: DeferredQueue::new(),
            pacing_world: None,
            tick_budget: TickBudget::new(),
            counters: GovernorCounters::default(),
            stats: StatsPublisher::new(),
            last_report: None,
            last_backlog_warning: None,
        })
    }

    /// Replaces the configuration. New budgets apply from the next frame.
    pub fn reload_config(&mut self, config: GovernorConfig) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            warn!("rejected governor config reload: {}", err);
            return Err(err);
        }
        info!("fluid governor config reloaded");
        config.log_summary();
        self.config = config;
        Ok(())
    }

    // Ingress

    /// A block next to `pos` changed. Prices the update and either buffers it
    /// for the fast path or queues it.
    pub fn on_neighbor_notify(&mut self, world: WorldId, pos: BlockPos, now: &Instant) -> NotifyOutcome {
        if !self.engine.is_position_loaded(world, &pos) {
            return NotifyOutcome::Ignored;
        }
        let fluid = match self.engine.read_fluid(world, &pos) {
            Ok(Some(fluid)) => fluid,
            Ok(None) => return NotifyOutcome::Ignored,
            Err(err) if err.is_unloaded() => return NotifyOutcome::Ignored,
            Err(err) => {
                debug!("neighbor notify at {:?} in {}: {}", pos, world, err);
                self.counters.engine_failures += 1;
                return NotifyOutcome::Failed;
            }
        };

        let engine = &self.engine;
        let state = self
            .queue
            .world_or_insert_with(world, || engine.player_positions(world), now);
        if state.is_blacklisted(&pos) {
            return NotifyOutcome::Ignored;
        }
        if state.fresh_positions.contains(&pos) {
            self.counters.coalesced += 1;
            return NotifyOutcome::Coalesced;
        }

        let priority = match price_update(
            engine,
            &self.oracle,
            self.config.pressure_enabled,
            world,
            &pos,
            &fluid,
            &BlockSnapshot::default(),
            state.players(),
        ) {
            Ok(priority) => priority,
            Err(err) if err.is_unloaded() => return NotifyOutcome::Ignored,
            Err(err) => {
                debug!("pricing update at {:?} in {}: {}", pos, world, err);
                self.counters.engine_failures += 1;
                return NotifyOutcome::Failed;
            }
        };

        let budgets = self.config.budgets(self.mode_machine.mode());
        let task = UpdateTask::new(UpdatePosition::new(world, pos), fluid.fluid, priority, now);
        let fast_path = budgets
            .fast_path_floor
            .is_some_and(|floor| priority > floor)
            && !state.is_queued(&pos);

        if fast_path {
            state.fresh_positions.insert(pos);
            state.fresh.push(task);
            return NotifyOutcome::FastPath;
        }

        match enqueue_task(state, task, budgets.chunk_queue_cap, &mut self.counters, now) {
            InsertOutcome::Inserted | InsertOutcome::Evicted(_) => NotifyOutcome::Queued,
            InsertOutcome::Replaced | InsertOutcome::Coalesced => NotifyOutcome::Coalesced,
        }
    }

    /// The simulator is about to run its per-block fluid tick at `pos`.
    /// On `Defer` the simulator must skip the work; the governor reschedules
    /// the position once budget allows.
    pub fn on_fluid_tick(
        &mut self,
        world: WorldId,
        pos: BlockPos,
        fluid: FluidSnapshot,
        block: BlockSnapshot,
        now: &Instant,
    ) -> ShouldProceed {
        let engine = &self.engine;
        let state = self
            .queue
            .world_or_insert_with(world, || engine.player_positions(world), now);

        let mode = if state.is_initialized() {
            self.mode_machine.mode()
        } else {
            self.counters.protocol_errors += 1;
            if state.take_protocol_warning() {
                warn!(
                    "fluid tick in {} before its first tick end; using {} mode budgets",
                    world,
                    Mode::Normal
                );
            }
            Mode::Normal
        };

        if state.cleared.remove(&pos) || state.is_blacklisted(&pos) {
            self.counters.bypassed += 1;
            return ShouldProceed::Proceed;
        }

        let priority = price_update(
            engine,
            &self.oracle,
            self.config.pressure_enabled,
            world,
            &pos,
            &fluid,
            &block,
            state.players(),
        )
        .unwrap_or(BASE_PRIORITY);

        let budgets = self.config.budgets(mode);
        let admission = admit(
            &mut self.tick_budget,
            &mut state.frame,
            mode,
            budgets,
            pos.chunk(),
            priority,
            || false,
        );
        match admission {
            Admission::Admitted => {
                self.counters.fluid_ticks_admitted += 1;
                // running now satisfies any update still queued or buffered here
                if state.remove(&pos).is_some() {
                    self.counters.coalesced += 1;
                }
                if state.fresh_positions.remove(&pos) {
                    state.fresh.retain(|task| task.pos() != &pos);
                    self.counters.coalesced += 1;
                }
                ShouldProceed::Proceed
            }
            Admission::Deferred | Admission::Dropped => {
                self.counters.deferred += 1;
                if state.fresh_positions.contains(&pos) {
                    // already buffered for the fast path
                    self.counters.coalesced += 1;
                    return ShouldProceed::Defer;
                }
                let task = UpdateTask::new(UpdatePosition::new(world, pos), fluid.fluid, priority, now);
                enqueue_task(state, task, budgets.chunk_queue_cap, &mut self.counters, now);
                ShouldProceed::Defer
            }
        }
    }

    /// The host finished a tick of `world`. Samples tick time, updates the
    /// mode, drains the world's queue within budget and publishes stats.
    pub fn on_world_tick_end(&mut self, world: WorldId, now: &Instant) -> DrainReport {
        if self.pacing_world.is_none() {
            info!("tick monitor now paced by {}", world);
            self.pacing_world = Some(world);
        }
        let is_pacing = self.pacing_world == Some(world);

        if is_pacing {
            self.tick_budget.reset(now);
            self.monitor.record_tick_end(now);
            let transition = self.mode_machine.evaluate(
                self.monitor.avg_tick_ms(),
                &self.config.thresholds,
                now,
            );
            if let Some(transition) = transition {
                let budget = self.config.budgets(transition.to).global_budget;
                self.engine.set_engine_budget(budget);
            }
        }

        let players = self.engine.player_positions(world);
        let state = self.queue.world_or_insert_with(world, Vec::new, now);
        state.players = players;
        state.record_tick_end();

        let mut scheduler = Scheduler {
            engine: &mut self.engine,
            oracle: &self.oracle,
            config: &self.config,
            mode: self.mode_machine.mode(),
            counters: &mut self.counters,
            tick: &mut self.tick_budget,
        };
        let report = scheduler.run(state, now);

        if state.last_gc.elapsed(now) >= self.config.gc_interval {
            let released = state.collect_idle_buckets(self.config.chunk_idle_ttl, now);
            state.failures.prune(now, self.config.failure_window);
            state.last_gc = *now;
            if released > 0 {
                debug!("released {} idle chunk buckets in {}", released, world);
            }
        }

        if is_pacing {
            self.report_activity(now);
        }
        self.publish_stats(now);

        report
    }

    /// Forgets everything pending for `world`
    pub fn on_world_unload(&mut self, world: WorldId, now: &Instant) {
        if let Some(state) = self.queue.remove_world(&world) {
            info!(
                "{} unloaded: cancelled {} pending fluid updates",
                world,
                state.len() + state.fresh.len()
            );
        }
        if self.pacing_world == Some(world) {
            self.pacing_world = None;
            self.monitor.restart_clock();
        }
        self.publish_stats(now);
    }

    // Accessors

    pub fn mode(&self) -> Mode {
        self.mode_machine.mode()
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn oracle(&self) -> &BiomeTraitOracle {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut BiomeTraitOracle {
        &mut self.oracle
    }

    pub fn monitor(&self) -> &TickMonitor {
        &self.monitor
    }

    pub fn mode_machine(&self) -> &ModeMachine {
        &self.mode_machine
    }

    pub fn counters(&self) -> &GovernorCounters {
        &self.counters
    }

    pub fn queue(&self) -> &DeferredQueue {
        &self.queue
    }

    pub fn world_state(&self, world: &WorldId) -> Option<&WorldState> {
        self.queue.world(world)
    }

    /// Total updates waiting in the queue and the fast-path buffer of `world`
    pub fn pending(&self, world: &WorldId) -> usize {
        self.queue
            .world(world)
            .map_or(0, |state| state.len() + state.fresh.len())
    }

    pub fn pacing_world(&self) -> Option<WorldId> {
        self.pacing_world
    }

    /// Admissions charged against the global budget since the pacing
    /// world's last tick end
    pub fn tick_budget(&self) -> &TickBudget {
        &self.tick_budget
    }

    pub fn stats_handle(&self) -> StatsHandle {
        self.stats.handle()
    }

    pub fn stats(&self) -> Arc<GovernorStats> {
        self.stats.latest()
    }

    fn report_activity(&mut self, now: &Instant) {
        let queued = self.queue.len();
        let interval = self.config.report_interval;

        if queued > self.config.backlog_warn_threshold {
            let warn_due = self
                .last_backlog_warning
                .map_or(true, |at| at.elapsed(now) >= interval);
            if warn_due {
                warn!(
                    "{} fluid updates queued across {} worlds in {} mode",
                    queued,
                    self.queue.world_count(),
                    self.mode_machine.mode()
                );
                self.last_backlog_warning = Some(*now);
            }
        }

        let Some(last_report) = self.last_report else {
            self.last_report = Some(*now);
            return;
        };
        if last_report.elapsed(now) < interval {
            return;
        }
        self.last_report = Some(*now);
        let counters = &self.counters;
        info!(
            "fluid governor: {} mode, {:.1} tps (avg {:.2}ms, max {:.2}ms), {} slow / {} critical ticks",
            self.mode_machine.mode(),
            self.monitor.tps(),
            self.monitor.avg_tick_ms(),
            self.monitor.max_tick_ms(),
            self.monitor.slow_ticks(),
            self.monitor.critical_ticks(),
        );
        info!(
            "fluid governor: {} queued, {} admitted, {} deferred, {} dropped, {} evicted, {} failures, {} blacklisted",
            queued,
            counters.admitted + counters.fluid_ticks_admitted,
            counters.deferred,
            counters.dropped,
            counters.evicted,
            counters.engine_failures,
            counters.blacklisted,
        );
    }

    fn publish_stats(&self, now: &Instant) {
        let worlds: Vec<WorldStats> = self
            .queue
            .worlds()
            .map(|state| WorldStats {
                world: state.world(),
                queued: state.len(),
                active_chunks: state.active_chunk_count(),
                buckets: state.bucket_count(),
                admitted_this_tick: state.frame().admitted_this_tick(),
                blacklisted: state.failures().blacklisted_count(),
            })
            .collect();

        self.stats.publish(GovernorStats {
            mode: self.mode_machine.mode(),
            avg_tick_ms: self.monitor.avg_tick_ms(),
            tps: self.monitor.tps(),
            total_ticks: self.monitor.total_ticks(),
            max_tick_ms: self.monitor.max_tick_ms(),
            slow_ticks: self.monitor.slow_ticks(),
            critical_ticks: self.monitor.critical_ticks(),
            counters: self.counters,
            tick_admitted: self.tick_budget.admitted(),
            queued: worlds.iter().map(|stats| stats.queued).sum(),
            worlds,
            last_transition: self.mode_machine.last_transition().copied(),
            transition_count: self.mode_machine.transition_count(),
            published_at: Some(*now),
        });
    }
}
