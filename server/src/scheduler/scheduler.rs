use std::time::Duration;

use log::{debug, warn};

use floodgate_shared::{
    BiomeTraitOracle, BlockSnapshot, ChunkKey, EngineError, FluidEngine, Instant, Mode,
};

use crate::{
    admission::{admit, chunk_order, Admission, TickBudget, EMERGENCY_PRIORITY_FLOOR},
    governor::{GovernorConfig, ModeBudgets},
    queue::{InsertOutcome, UpdateTask, WorldState},
    scheduler::price_update,
    stats::GovernorCounters,
};

/// What one drain did, for logging and inspection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub fast_path_admitted: u32,
    pub admitted: u32,
    pub failed: u32,
    pub dropped: u32,
    pub unloaded: u32,
    pub reprioritized: u32,
    pub chunks_visited: usize,
}

/// Inserts into the world's queue and counts the outcome
pub(crate) fn enqueue_task(
    state: &mut WorldState,
    task: UpdateTask,
    cap: usize,
    counters: &mut GovernorCounters,
    now: &Instant,
) -> InsertOutcome {
    let outcome = state.enqueue(task, cap, now);
    match outcome {
        InsertOutcome::Inserted => counters.enqueued += 1,
        InsertOutcome::Evicted(evicted) => {
            counters.enqueued += 1;
            counters.evicted += 1;
            debug!(
                "evicted update at {:?} (priority {}) for priority {}",
                evicted.position.pos, evicted.priority, task.priority
            );
        }
        InsertOutcome::Replaced | InsertOutcome::Coalesced => counters.coalesced += 1,
    }
    outcome
}

enum Dispatch {
    Rescheduled,
    Retry,
    Discarded,
}

/// Drains one world's queue at its tick end
pub(crate) struct Scheduler<'a, E: FluidEngine> {
    pub engine: &'a mut E,
    pub oracle: &'a BiomeTraitOracle,
    pub config: &'a GovernorConfig,
    pub mode: Mode,
    pub counters: &'a mut GovernorCounters,
    /// Global admissions of the current server tick, across all worlds
    pub tick: &'a mut TickBudget,
}

impl<'a, E: FluidEngine> Scheduler<'a, E> {
    fn budgets(&self) -> &'a ModeBudgets {
        self.config.budgets(self.mode)
    }

    /// Resets the frame, admits the fast path, drains queued updates in
    /// chunk order within budget, then sweeps old updates
    pub fn run(&mut self, state: &mut WorldState, now: &Instant) -> DrainReport {
        let mut report = DrainReport::default();
        let mut retries: Vec<UpdateTask> = Vec::new();

        state.frame.reset(now);
        state.cleared.clear();

        self.admit_fresh(state, &mut retries, &mut report, now);
        self.drain_queued(state, &mut retries, &mut report, now);

        let penalty = self.config.failure_priority_penalty;
        let cap = self.budgets().chunk_queue_cap;
        for mut task in retries {
            task.priority = task.priority.saturating_sub(penalty);
            task.enqueued_at = *now;
            enqueue_task(state, task, cap, self.counters, now);
        }

        self.sweep_stale(state, &mut report, now);

        if report.admitted > 0 || report.dropped > 0 || report.failed > 0 {
            debug!(
                "{} drain in {} mode: admitted {} ({} fast path), failed {}, dropped {}, {} queued",
                state.world(),
                self.mode,
                report.admitted,
                report.fast_path_admitted,
                report.failed,
                report.dropped,
                state.len(),
            );
        }

        report
    }

    fn admit_fresh(
        &mut self,
        state: &mut WorldState,
        retries: &mut Vec<UpdateTask>,
        report: &mut DrainReport,
        now: &Instant,
    ) {
        let fresh = std::mem::take(&mut state.fresh);
        state.fresh_positions.clear();
        let budgets = self.budgets();

        for task in fresh {
            let world = task.position.world;
            if !self.engine.is_position_loaded(world, task.pos()) {
                self.counters.unloaded += 1;
                report.unloaded += 1;
                continue;
            }
            // the mode or its floor may have changed since the update was buffered
            let admission = match budgets.fast_path_floor {
                Some(floor) if task.priority > floor => admit(
                    &mut *self.tick,
                    &mut state.frame,
                    self.mode,
                    budgets,
                    task.chunk(),
                    task.priority,
                    || false,
                ),
                _ => Admission::Deferred,
            };
            match admission {
                Admission::Admitted => {
                    state.frame.set_last_drained(task.chunk());
                    if let Dispatch::Rescheduled = self.dispatch(state, task, retries, report, now) {
                        self.counters.fast_path_admitted += 1;
                        report.fast_path_admitted += 1;
                    }
                }
                Admission::Deferred | Admission::Dropped => {
                    self.counters.deferred += 1;
                    enqueue_task(state, task, budgets.chunk_queue_cap, self.counters, now);
                }
            }
        }
    }

    fn drain_queued(
        &mut self,
        state: &mut WorldState,
        retries: &mut Vec<UpdateTask>,
        report: &mut DrainReport,
        now: &Instant,
    ) {
        let budgets = self.budgets();
        let order = chunk_order(
            state.active_chunks(),
            state.players(),
            self.config.player_chunk_radius,
            state.round_robin_cursor,
        );
        state.round_robin_cursor = state.round_robin_cursor.wrapping_add(1);
        report.chunks_visited = order.len();

        // proximal chunks are exhausted or capped before any distal chunk
        for phase in [&order.proximal, &order.distal] {
            loop {
                let mut progressed = false;
                for chunk in phase.iter() {
                    if self.tick.admitted() >= budgets.global_budget {
                        return;
                    }
                    if state.frame.chunk_admitted(chunk) >= budgets.chunk_budget {
                        continue;
                    }
                    if self.drain_one(state, chunk, retries, report, now) {
                        progressed = true;
                    }
                }
                if !progressed {
                    break;
                }
            }
        }
    }

    /// Polls and handles the best task of one chunk. Returns false when the
    /// chunk had nothing it could offer this tick.
    fn drain_one(
        &mut self,
        state: &mut WorldState,
        chunk: &ChunkKey,
        retries: &mut Vec<UpdateTask>,
        report: &mut DrainReport,
        now: &Instant,
    ) -> bool {
        let Some(best) = state.peek_best(chunk) else {
            return false;
        };
        if self.mode == Mode::Emergency && best.priority < EMERGENCY_PRIORITY_FLOOR {
            return false;
        }
        let Some(task) = state.poll_best(chunk, now) else {
            return false;
        };

        let world = task.position.world;
        if !self.engine.is_position_loaded(world, task.pos()) {
            self.counters.unloaded += 1;
            report.unloaded += 1;
            return true;
        }

        let budgets = self.budgets();
        let engine = &*self.engine;
        let admission = admit(
            &mut *self.tick,
            &mut state.frame,
            self.mode,
            budgets,
            *chunk,
            task.priority,
            || fluid_is_gone(engine, &task, budgets.stale_ttl, now),
        );
        match admission {
            Admission::Admitted => {
                state.frame.set_last_drained(*chunk);
                self.dispatch(state, task, retries, report, now);
                true
            }
            Admission::Dropped => {
                self.counters.dropped += 1;
                report.dropped += 1;
                true
            }
            Admission::Deferred => {
                state.restore(task, now);
                false
            }
        }
    }

    /// Hands an admitted task to the engine
    fn dispatch(
        &mut self,
        state: &mut WorldState,
        task: UpdateTask,
        retries: &mut Vec<UpdateTask>,
        report: &mut DrainReport,
        now: &Instant,
    ) -> Dispatch {
        let world = task.position.world;
        let pos = *task.pos();

        match self.engine.reschedule_fluid_at(world, &pos, task.fluid, 1) {
            Ok(()) => {
                state.cleared.insert(pos);
                state.failures.record_success(&pos);
                self.counters.admitted += 1;
                report.admitted += 1;
                Dispatch::Rescheduled
            }
            Err(EngineError::PositionUnloaded { .. }) => {
                self.counters.unloaded += 1;
                report.unloaded += 1;
                Dispatch::Discarded
            }
            Err(err) => {
                self.counters.engine_failures += 1;
                report.failed += 1;
                let blacklisted = state.failures.record_failure(
                    &pos,
                    now,
                    self.config.failure_window,
                    self.config.failure_limit,
                );
                if blacklisted {
                    self.counters.blacklisted += 1;
                    warn!(
                        "blacklisting fluid updates at {:?} in {} after repeated failures: {}",
                        pos, world, err
                    );
                    return Dispatch::Discarded;
                }
                debug!("reschedule at {:?} in {} failed: {}", pos, world, err);
                retries.push(task);
                Dispatch::Retry
            }
        }
    }

    /// Checks every task queued longer than the stale ttl against the world:
    /// gone fluid is dropped, present fluid is re-priced and kept
    fn sweep_stale(&mut self, state: &mut WorldState, report: &mut DrainReport, now: &Instant) {
        let budgets = self.budgets();
        let ttl = budgets.stale_ttl;
        let chunks: Vec<ChunkKey> = state
            .active_chunks()
            .filter(|chunk| {
                state
                    .bucket(chunk)
                    .and_then(|bucket| bucket.oldest_enqueued_at())
                    .is_some_and(|oldest| oldest.elapsed(now) > ttl)
            })
            .copied()
            .collect();

        for chunk in chunks {
            for mut task in state.take_older_than(&chunk, ttl, now) {
                let world = task.position.world;
                let pos = *task.pos();

                if !self.engine.is_position_loaded(world, &pos) {
                    self.counters.unloaded += 1;
                    report.unloaded += 1;
                    continue;
                }
                let fluid = match self.engine.read_fluid(world, &pos) {
                    Ok(Some(fluid)) if fluid.fluid == task.fluid => fluid,
                    Ok(_) => {
                        self.counters.dropped += 1;
                        report.dropped += 1;
                        continue;
                    }
                    Err(err) if err.is_unloaded() => {
                        self.counters.unloaded += 1;
                        report.unloaded += 1;
                        continue;
                    }
                    Err(err) => {
                        debug!("stale check at {:?} in {} failed: {}", pos, world, err);
                        self.counters.engine_failures += 1;
                        state.restore(task, now);
                        continue;
                    }
                };

                if let Ok(priority) = price_update(
                    &*self.engine,
                    self.oracle,
                    self.config.pressure_enabled,
                    world,
                    &pos,
                    &fluid,
                    &BlockSnapshot::default(),
                    state.players(),
                ) {
                    task.priority = priority;
                }
                task.enqueued_at = *now;
                self.counters.reprioritized += 1;
                report.reprioritized += 1;
                if let InsertOutcome::Evicted(_) = state.enqueue(task, budgets.chunk_queue_cap, now) {
                    self.counters.evicted += 1;
                }
            }
        }
    }
}

/// True when the task is past its ttl and its fluid is no longer at the
/// position. Failed reads never count as gone.
fn fluid_is_gone<E: FluidEngine + ?Sized>(
    engine: &E,
    task: &UpdateTask,
    ttl: Duration,
    now: &Instant,
) -> bool {
    if !task.is_older_than(ttl, now) {
        return false;
    }
    match engine.read_fluid(task.position.world, task.pos()) {
        Ok(Some(fluid)) => fluid.fluid != task.fluid,
        Ok(None) => true,
        Err(_) => false,
    }
}
