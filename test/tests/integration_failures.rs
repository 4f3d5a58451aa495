/// Integration tests for engine failure handling in the drain loop
/// Covers transient reschedule failures, blacklisting, unloaded chunks and
/// failed stale checks.

use floodgate_server::ShouldProceed;
use floodgate_shared::{BlockPos, ChunkKey, FluidSnapshot, Mode, WorldId};
use floodgate_test::{fill_chunk, MockFluidEngine, TestHarness, WATER};

const OVERWORLD: WorldId = WorldId::new(0);

#[test]
fn failed_reschedule_is_retained_with_lower_priority() {
    let mut engine = MockFluidEngine::new();
    let positions = fill_chunk(&mut engine, OVERWORLD, ChunkKey::new(0, 0), 2);
    engine.fail_reschedules_at(OVERWORLD, positions[0]);
    let mut harness = TestHarness::flat_priority(engine);
    for pos in &positions {
        harness.notify(OVERWORLD, *pos);
    }

    let report = harness.end_tick(OVERWORLD);

    assert_eq!(report.failed, 1);
    assert_eq!(report.admitted, 1);
    assert_eq!(harness.governor.counters().engine_failures, 1);
    let state = harness.governor.world_state(&OVERWORLD).expect("world");
    let retained = state.queued_task(&positions[0]).expect("failed task is retained");
    assert_eq!(retained.priority, 45);
    // the failed attempt still consumed budget
    assert_eq!(harness.admitted_this_tick(&OVERWORLD), 2);
}

#[test]
fn repeated_failures_blacklist_position() {
    let mut engine = MockFluidEngine::new();
    let positions = fill_chunk(&mut engine, OVERWORLD, ChunkKey::new(0, 0), 1);
    let pos = positions[0];
    engine.fail_reschedules_at(OVERWORLD, pos);
    let mut harness = TestHarness::flat_priority(engine);
    harness.notify(OVERWORLD, pos);

    harness.run_ticks(OVERWORLD, 2);
    assert!(harness.governor.world_state(&OVERWORLD).expect("world").is_queued(&pos));

    harness.end_tick(OVERWORLD);

    let counters = harness.governor.counters();
    assert_eq!(counters.engine_failures, 3);
    assert_eq!(counters.blacklisted, 1);
    let state = harness.governor.world_state(&OVERWORLD).expect("world");
    assert!(state.is_blacklisted(&pos));
    assert!(!state.is_queued(&pos));

    // blacklisted positions bypass the governor entirely
    let admitted = harness.admitted_this_tick(&OVERWORLD);
    assert_eq!(
        harness.fluid_tick(OVERWORLD, pos, FluidSnapshot::flowing(WATER, 4)),
        ShouldProceed::Proceed
    );
    assert_eq!(harness.admitted_this_tick(&OVERWORLD), admitted);
    assert_eq!(harness.governor.counters().bypassed, 1);
}

#[test]
fn success_between_failures_resets_the_count() {
    let mut engine = MockFluidEngine::new();
    let positions = fill_chunk(&mut engine, OVERWORLD, ChunkKey::new(0, 0), 1);
    let pos = positions[0];
    let mut harness = TestHarness::flat_priority(engine);

    for _ in 0..2 {
        harness.engine_mut().fail_reschedules_at(OVERWORLD, pos);
        harness.notify(OVERWORLD, pos);
        harness.end_tick(OVERWORLD);
    }
    harness.engine_mut().heal_reschedules_at(OVERWORLD, &pos);
    harness.end_tick(OVERWORLD);
    assert_eq!(harness.engine().reschedules().len(), 1);

    harness.engine_mut().fail_reschedules_at(OVERWORLD, pos);
    harness.notify(OVERWORLD, pos);
    harness.end_tick(OVERWORLD);

    let state = harness.governor.world_state(&OVERWORLD).expect("world");
    assert!(!state.is_blacklisted(&pos));
    assert!(state.is_queued(&pos));
}

#[test]
fn failures_outside_window_do_not_blacklist() {
    let mut engine = MockFluidEngine::new();
    let positions = fill_chunk(&mut engine, OVERWORLD, ChunkKey::new(0, 0), 1);
    let pos = positions[0];
    engine.fail_reschedules_at(OVERWORLD, pos);
    let mut harness = TestHarness::flat_priority(engine).with_tick_ms(40_000);
    harness.notify(OVERWORLD, pos);

    harness.run_ticks(OVERWORLD, 5);

    let state = harness.governor.world_state(&OVERWORLD).expect("world");
    assert!(!state.is_blacklisted(&pos));
    assert_eq!(harness.governor.counters().engine_failures, 5);
}

#[test]
fn unloaded_chunk_discards_queued_updates_silently() {
    let mut engine = MockFluidEngine::new();
    let chunk = ChunkKey::new(4, 4);
    let positions = fill_chunk(&mut engine, OVERWORLD, chunk, 10);
    let mut harness = TestHarness::flat_priority(engine);
    for pos in &positions {
        harness.notify(OVERWORLD, *pos);
    }

    harness.engine_mut().unload_chunk(OVERWORLD, chunk);
    let report = harness.end_tick(OVERWORLD);

    assert_eq!(report.unloaded, 10);
    assert_eq!(report.admitted, 0);
    let counters = harness.governor.counters();
    assert_eq!(counters.dropped, 0, "unloaded updates are not drops");
    assert_eq!(counters.unloaded, 10);
    assert_eq!(harness.pending(&OVERWORLD), 0);
    assert_eq!(harness.admitted_this_tick(&OVERWORLD), 0);
}

#[test]
fn failed_stale_check_keeps_task_unchanged() {
    let mut engine = MockFluidEngine::new();
    let pos = BlockPos::new(3, 64, 3);
    engine.set_fluid(OVERWORLD, pos, FluidSnapshot::flowing(WATER, 2));
    let mut harness = TestHarness::flat_priority(engine).with_tick_ms(200);
    // flat priority updates are never admitted in emergency mode
    while harness.mode() != Mode::Emergency {
        harness.end_tick(OVERWORLD);
    }

    harness.notify(OVERWORLD, pos);
    let enqueued_at = harness
        .governor
        .world_state(&OVERWORLD)
        .and_then(|state| state.queued_task(&pos))
        .expect("queued")
        .enqueued_at;
    harness.engine_mut().fail_reads_at(OVERWORLD, pos);
    harness.engine_mut().remove_fluid(OVERWORLD, &pos);

    harness.run_ticks(OVERWORLD, 40);

    assert_eq!(harness.mode(), Mode::Emergency);
    let state = harness.governor.world_state(&OVERWORLD).expect("world");
    let task = state.queued_task(&pos).expect("kept despite failed reads");
    assert_eq!(task.enqueued_at, enqueued_at);
    assert_eq!(harness.governor.counters().dropped, 0);
    assert!(harness.governor.counters().engine_failures > 0);

    harness.engine_mut().heal_reads_at(OVERWORLD, &pos);
    harness.end_tick(OVERWORLD);
    assert_eq!(harness.governor.counters().dropped, 1);
    assert_eq!(harness.pending(&OVERWORLD), 0);
}
