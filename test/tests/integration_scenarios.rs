/// End-to-end scenarios for the fluid governor
/// Each test drives a Governor over the in-memory engine with a simulated clock.

use floodgate_server::{GovernorConfig, NotifyOutcome};
use floodgate_shared::{BlockPos, ChunkKey, FluidSnapshot, Mode, PlayerPosition, WorldId};
use floodgate_test::{fill_chunk, MockFluidEngine, TestHarness, WATER};

const OVERWORLD: WorldId = WorldId::new(0);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Feeds overloaded ticks until the governor reaches emergency mode
fn drive_to_emergency(harness: &mut TestHarness) {
    for _ in 0..100 {
        harness.end_tick_after(OVERWORLD, 200);
        if harness.mode() == Mode::Emergency {
            return;
        }
    }
    panic!("governor never reached emergency mode");
}

/// Water one level deep with solid ground below, well under the floating layer height
fn low_priority_water(engine: &mut MockFluidEngine, pos: BlockPos) {
    engine.set_solid(OVERWORLD, pos.below());
    engine.set_fluid(OVERWORLD, pos, FluidSnapshot::flowing(WATER, 1));
}

#[test]
fn steady_state_admits_everything_in_one_tick() {
    init_logging();
    let mut engine = MockFluidEngine::new();
    let mut positions = Vec::new();
    for chunk_x in 0..20 {
        positions.extend(fill_chunk(&mut engine, OVERWORLD, ChunkKey::new(chunk_x, 0), 25));
    }
    let mut harness = TestHarness::flat_priority(engine);

    for pos in &positions {
        assert_eq!(harness.notify(OVERWORLD, *pos), NotifyOutcome::Queued);
    }
    assert_eq!(harness.pending(&OVERWORLD), 500);

    harness.end_tick(OVERWORLD);

    assert_eq!(harness.mode(), Mode::Normal);
    assert_eq!(harness.admitted_this_tick(&OVERWORLD), 500);
    assert_eq!(harness.pending(&OVERWORLD), 0, "nothing should be deferred");
    assert_eq!(harness.engine().tick_reschedules().len(), 500);
    assert!(harness
        .engine()
        .tick_reschedules()
        .iter()
        .all(|reschedule| reschedule.delay_ticks == 1));
}

#[test]
fn hot_chunk_drains_at_chunk_budget_per_tick() {
    init_logging();
    let mut engine = MockFluidEngine::new();
    let positions = fill_chunk(&mut engine, OVERWORLD, ChunkKey::new(3, -2), 600);
    let mut harness = TestHarness::flat_priority(engine);

    for pos in &positions {
        harness.notify(OVERWORLD, *pos);
    }
    // equal priorities are never evicted, even past the chunk queue cap
    assert_eq!(harness.pending(&OVERWORLD), 600);

    harness.end_tick(OVERWORLD);
    assert_eq!(harness.admitted_this_tick(&OVERWORLD), 100);
    assert_eq!(harness.pending(&OVERWORLD), 500);

    harness.end_tick(OVERWORLD);
    assert_eq!(harness.mode(), Mode::Normal);
    assert_eq!(harness.admitted_this_tick(&OVERWORLD), 100);
    assert_eq!(harness.pending(&OVERWORLD), 400);

    harness.run_ticks(OVERWORLD, 4);
    assert_eq!(harness.pending(&OVERWORLD), 0);
    assert_eq!(harness.engine().reschedules().len(), 600);
    assert_eq!(harness.governor.counters().evicted, 0);
}

#[test]
fn player_proximal_chunk_drains_first() {
    init_logging();
    let near = ChunkKey::new(0, 0);
    let far = ChunkKey::new(13, 0);
    let mut engine = MockFluidEngine::new();
    // 10 blocks from the center of the near chunk, about 200 from the far one
    engine.set_players(OVERWORLD, vec![PlayerPosition::new(18.0, 64.0, 8.0)]);
    // the far chunk is queued first so arrival order cannot explain the result
    let far_positions = fill_chunk(&mut engine, OVERWORLD, far, 50);
    let near_positions = fill_chunk(&mut engine, OVERWORLD, near, 50);
    let mut harness = TestHarness::flat_priority(engine);

    for pos in far_positions.iter().chain(near_positions.iter()) {
        harness.notify(OVERWORLD, *pos);
    }
    harness.end_tick(OVERWORLD);

    let drained = harness.engine().tick_reschedules();
    assert_eq!(drained.len(), 100);
    let last_near = drained
        .iter()
        .rposition(|reschedule| reschedule.pos.chunk() == near)
        .expect("near chunk drained");
    let first_far = drained
        .iter()
        .position(|reschedule| reschedule.pos.chunk() == far)
        .expect("far chunk drained");
    assert!(
        last_near < first_far,
        "every near update should be drained before any far update"
    );
}

#[test]
fn sustained_overload_descends_to_emergency() {
    init_logging();
    let mut harness = TestHarness::new(GovernorConfig::default(), MockFluidEngine::new())
        .expect("default config is valid");

    for _ in 0..40 {
        harness.end_tick_after(OVERWORLD, 25);
    }
    assert_eq!(harness.mode(), Mode::Normal);

    let mut seen = Vec::new();
    for _ in 0..40 {
        harness.end_tick_after(OVERWORLD, 70);
        if seen.last() != Some(&harness.mode()) {
            seen.push(harness.mode());
        }
    }
    assert_eq!(seen, vec![Mode::Normal, Mode::Degraded]);

    // the degraded -> emergency edge needs its own sustained second
    for _ in 0..30 {
        harness.end_tick_after(OVERWORLD, 70);
    }
    assert_eq!(harness.mode(), Mode::Emergency);
    assert_eq!(harness.engine().budget_history(), &[800, 100]);

    let low = BlockPos::new(4, 40, 4);
    let floating = BlockPos::new(8, 70, 8);
    low_priority_water(harness.engine_mut(), low);
    harness
        .engine_mut()
        .set_fluid(OVERWORLD, floating, FluidSnapshot::flowing(WATER, 1));
    harness.notify(OVERWORLD, low);
    harness.notify(OVERWORLD, floating);

    harness.end_tick_after(OVERWORLD, 70);
    let drained: Vec<BlockPos> = harness
        .engine()
        .tick_reschedules()
        .iter()
        .map(|reschedule| reschedule.pos)
        .collect();
    assert_eq!(drained, vec![floating]);
    assert!(harness.governor.world_state(&OVERWORLD).expect("world").is_queued(&low));
}

#[test]
fn floating_layer_is_rescued_during_emergency() {
    init_logging();
    let mut harness = TestHarness::new(GovernorConfig::default(), MockFluidEngine::new())
        .expect("default config is valid");
    drive_to_emergency(&mut harness);

    let floating = BlockPos::new(100, 70, 100);
    harness
        .engine_mut()
        .set_fluid(OVERWORLD, floating, FluidSnapshot::flowing(WATER, 1));
    let grounded: Vec<BlockPos> = (0..5).map(|i| BlockPos::new(100 + i, 40, 96)).collect();
    for pos in &grounded {
        low_priority_water(harness.engine_mut(), *pos);
    }

    harness.notify(OVERWORLD, floating);
    for pos in &grounded {
        harness.notify(OVERWORLD, *pos);
    }
    let state = harness.governor.world_state(&OVERWORLD).expect("world");
    let floating_priority = state.queued_task(&floating).expect("queued").priority;
    assert!(floating_priority >= 90, "floating layer priority {}", floating_priority);
    for pos in &grounded {
        assert!(state.queued_task(pos).expect("queued").priority < 90);
    }

    harness.end_tick_after(OVERWORLD, 200);
    assert_eq!(harness.mode(), Mode::Emergency);
    let drained = harness.engine().tick_reschedules();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].pos, floating);
    assert_eq!(harness.pending(&OVERWORLD), grounded.len());
}

#[test]
fn stale_task_is_discarded_once_its_fluid_is_gone() {
    init_logging();
    let mut harness = TestHarness::new(GovernorConfig::default(), MockFluidEngine::new())
        .expect("default config is valid")
        .with_tick_ms(70);
    drive_to_emergency(&mut harness);

    let pos = BlockPos::new(-20, 40, 35);
    low_priority_water(harness.engine_mut(), pos);
    assert_eq!(harness.notify(OVERWORLD, pos), NotifyOutcome::Queued);
    let admitted_before = harness.governor.counters().admitted;

    harness.run_ticks(OVERWORLD, 30);
    assert_eq!(harness.mode(), Mode::Emergency);
    assert_eq!(harness.pending(&OVERWORLD), 1);
    harness.engine_mut().remove_fluid(OVERWORLD, &pos);

    harness.run_ticks(OVERWORLD, 170);

    let counters = harness.governor.counters();
    assert_eq!(counters.dropped, 1);
    assert_eq!(counters.admitted, admitted_before);
    assert_eq!(harness.pending(&OVERWORLD), 0);
}

#[test]
fn stale_task_with_fluid_present_is_kept() {
    init_logging();
    let mut harness = TestHarness::new(GovernorConfig::default(), MockFluidEngine::new())
        .expect("default config is valid")
        .with_tick_ms(70);
    drive_to_emergency(&mut harness);

    let pos = BlockPos::new(-20, 40, 35);
    low_priority_water(harness.engine_mut(), pos);
    harness.notify(OVERWORLD, pos);

    harness.run_ticks(OVERWORLD, 200);

    let counters = harness.governor.counters();
    assert_eq!(counters.dropped, 0);
    assert!(counters.reprioritized >= 1);
    assert_eq!(harness.pending(&OVERWORLD), 1);
}

#[test]
fn global_budget_is_shared_across_worlds() {
    init_logging();
    let worlds = [WorldId::new(0), WorldId::new(1), WorldId::new(2)];
    let mut engine = MockFluidEngine::new();
    let mut positions = Vec::new();
    for world in worlds {
        for index in 0..30 {
            let chunk = ChunkKey::new(index % 6, index / 6);
            for pos in fill_chunk(&mut engine, world, chunk, 100) {
                positions.push((world, pos));
            }
        }
    }
    let mut harness = TestHarness::flat_priority(engine);
    for (world, pos) in positions {
        assert_eq!(harness.notify(world, pos), NotifyOutcome::Queued);
    }

    // the first world to end its tick paces the server tick
    let mut per_tick = Vec::new();
    for tick_ms in [20; 5] {
        let admitted: Vec<u32> = worlds
            .iter()
            .enumerate()
            .map(|(index, world)| {
                let elapsed = if index == 0 { tick_ms } else { 0 };
                harness.end_tick_after(*world, elapsed).admitted
            })
            .collect();
        assert!(admitted.iter().sum::<u32>() <= 2000, "server tick admitted {:?}", admitted);
        assert_eq!(harness.governor.tick_budget().admitted(), admitted.iter().sum::<u32>());
        per_tick.push(admitted);
    }

    assert_eq!(
        per_tick,
        vec![
            vec![2000, 0, 0],
            vec![1000, 1000, 0],
            vec![0, 2000, 0],
            vec![0, 0, 2000],
            vec![0, 0, 1000],
        ]
    );
    assert_eq!(harness.mode(), Mode::Normal);
    for world in &worlds {
        assert_eq!(harness.pending(world), 0);
    }
}
