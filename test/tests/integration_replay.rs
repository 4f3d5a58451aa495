/// Determinism tests
/// Replaying the same seeded workload against fresh governors must produce
/// identical reschedule sequences, counters and queue contents.

use floodgate_server::GovernorConfig;
use floodgate_shared::WorldId;
use floodgate_test::{random_workload, replay, MockFluidEngine, ReplayEvent, TestHarness};

const SEEDS: [u64; 4] = [1, 7, 42, 0xF100D];

fn run(events: &[ReplayEvent]) -> TestHarness {
    let mut harness = TestHarness::new(GovernorConfig::default(), MockFluidEngine::new())
        .expect("default config is valid");
    replay(&mut harness, events);
    harness
}

#[test]
fn same_workload_replays_identically() {
    for seed in SEEDS {
        let events = random_workload(seed, 5_000);
        assert_eq!(events, random_workload(seed, 5_000), "workload for seed {}", seed);

        let first = run(&events);
        let second = run(&events);

        assert_eq!(
            first.engine().reschedules(),
            second.engine().reschedules(),
            "reschedule sequence for seed {}",
            seed
        );
        assert_eq!(first.governor.counters(), second.governor.counters());
        assert_eq!(first.mode(), second.mode());
        for world in [WorldId::new(0), WorldId::new(1)] {
            assert_eq!(first.pending(&world), second.pending(&world));
            let queued = |harness: &TestHarness| {
                harness.governor.world_state(&world).map(|state| {
                    state
                        .active_chunks()
                        .filter_map(|chunk| state.bucket(chunk))
                        .flat_map(|bucket| bucket.iter().copied())
                        .collect::<Vec<_>>()
                })
            };
            assert_eq!(queued(&first), queued(&second));
        }
    }
}

#[test]
fn replayed_workload_makes_progress() {
    let events = random_workload(42, 5_000);
    let harness = run(&events);

    let counters = harness.governor.counters();
    assert!(counters.admitted > 0);
    assert!(!harness.engine().reschedules().is_empty());
}
