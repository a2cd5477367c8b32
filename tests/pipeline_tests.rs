use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use body_pipeline::*;
use crossbeam_channel::bounded;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn state(scenario: Scenario, dt: f64, iterations: u64, workers: usize) -> SimulationState {
    scenario
        .into_state(&SimulationConfig::new(dt, iterations, workers))
        .expect("valid scenario")
}

#[test]
fn two_bodies_match_the_closed_form_step() {
    init_logging();
    let report = Pipeline::new(state(Scenario::two_bodies().expect("scenario"), 0.01, 1, 2))
        .run()
        .expect("run succeeds");

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.iterations_completed, 1);

    let light = report.final_state.body(BodyId(0)).expect("body 0");
    let heavy = report.final_state.body(BodyId(1)).expect("body 1");

    // |F| = 0.01 * m_other / 0.2^2 along the x axis; bodies start at rest.
    assert_relative_eq!(light.acceleration.x, -0.5, epsilon = 1e-12);
    assert_relative_eq!(light.velocity.x, -0.005, epsilon = 1e-12);
    assert_relative_eq!(light.position.x, -0.10005, epsilon = 1e-12);
    assert_relative_eq!(heavy.acceleration.x, 0.125, epsilon = 1e-12);
    assert_relative_eq!(heavy.velocity.x, 0.00125, epsilon = 1e-12);
    assert_relative_eq!(heavy.position.x, 0.1000125, epsilon = 1e-12);
    assert_eq!(light.position.y, 0.0);
    assert_eq!(heavy.velocity.y, 0.0);
}

#[test]
fn worker_count_does_not_change_the_outcome() {
    init_logging();
    let scenario = Scenario::custom(60, 21).expect("scenario");
    let single = Pipeline::new(state(scenario.clone(), 0.01, 8, 1))
        .run()
        .expect("run succeeds");
    let many = Pipeline::new(state(scenario, 0.01, 8, 7))
        .run()
        .expect("run succeeds");

    assert_eq!(single.iterations_completed, 8);
    assert!(single.final_state.same_bodies(&many.final_state));
}

#[test]
fn run_ends_after_the_iteration_budget() {
    init_logging();
    let counter = Arc::new(AtomicU64::new(0));
    let seen = Arc::clone(&counter);
    let report = Pipeline::new(state(Scenario::three_bodies().expect("scenario"), 0.01, 25, 3))
        .on_iteration_complete(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .run()
        .expect("run succeeds");

    assert_eq!(counter.load(Ordering::SeqCst), 25);
    assert_eq!(report.iterations_completed, 25);
    assert_relative_eq!(report.virtual_time, 0.25, epsilon = 1e-9);
    assert_eq!(report.profile.iterations, 25);
}

#[test]
fn bodies_stay_inside_the_boundary() {
    init_logging();
    let report = simulate(
        Scenario::some_bodies(3).expect("scenario"),
        &SimulationConfig::new(0.01, 30, 4),
    )
    .expect("run succeeds");

    let boundary = report.final_state.boundary();
    assert_eq!(report.final_state.body_count(), 100);
    assert!(report
        .final_state
        .bodies()
        .all(|body| boundary.contains(body.position)));
}

#[test]
fn stop_ends_a_long_run_early() {
    init_logging();
    let (tx, rx) = bounded(1);
    let handle = Pipeline::new(state(Scenario::custom(20, 8).expect("scenario"), 0.01, 1_000_000, 2))
        .on_iteration_complete(move |i| {
            if i == 5 {
                let _ = tx.try_send(i);
            }
        })
        .launch()
        .expect("launch succeeds");

    handle.start();
    assert_eq!(rx.recv_timeout(Duration::from_secs(30)), Ok(5));
    handle.stop();
    let report = handle.join().expect("stopped runs are not errors");

    assert_eq!(report.termination, Termination::Stopped);
    assert!(report.iterations_completed >= 5);
    assert!(report.iterations_completed < 1_000_000);
}

#[test]
fn stop_before_start_runs_nothing() {
    init_logging();
    let handle = Pipeline::new(state(Scenario::two_bodies().expect("scenario"), 0.01, 10, 2))
        .launch()
        .expect("launch succeeds");
    handle.stop();
    handle.start();

    let report = handle.join().expect("stopped runs are not errors");
    assert_eq!(report.termination, Termination::Stopped);
    assert_eq!(report.iterations_completed, 0);
    assert_eq!(report.profile.tasks_dispatched, 0);
}

#[test]
fn stop_interrupts_a_run_without_bodies() {
    init_logging();
    let empty = SimulationState::new(
        Vec::new(),
        Boundary::centered(1.0).expect("bounds"),
        &SimulationConfig::new(0.01, u64::MAX, 2),
    )
    .expect("empty state is valid");
    let handle = Pipeline::new(empty).launch().expect("launch succeeds");

    handle.start();
    thread::sleep(Duration::from_millis(50));
    handle.stop();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !handle.is_finished() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(handle.is_finished(), "coordinator kept running after stop");

    let report = handle.join().expect("stopped runs are not errors");
    assert_eq!(report.termination, Termination::Stopped);
    assert!(report.iterations_completed > 0);
    assert!(report.iterations_completed < u64::MAX);
}

#[test]
fn latest_snapshot_holds_the_final_iteration() {
    init_logging();
    let view = LatestSnapshot::new();
    let report = Pipeline::new(state(Scenario::three_bodies().expect("scenario"), 0.01, 12, 2))
        .with_view(view.clone())
        .run()
        .expect("run succeeds");

    let last = view.get().expect("a snapshot was displayed");
    assert_eq!(last.current_iteration(), 12);
    assert!(last.same_bodies(&report.final_state));
}

#[test]
fn closure_views_receive_every_iteration() {
    init_logging();
    let (tx, rx) = crossbeam_channel::unbounded();
    Pipeline::new(state(Scenario::two_bodies().expect("scenario"), 0.01, 4, 1))
        .with_view(move |snapshot: SimulationState| {
            let _ = tx.send(snapshot.current_iteration());
        })
        .run()
        .expect("run succeeds");

    let seen: Vec<u64> = rx.try_iter().collect();
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

#[test]
fn invalid_configuration_is_rejected_before_launch() {
    let scenario = Scenario::two_bodies().expect("scenario");
    for config in [
        SimulationConfig::new(0.0, 10, 2),
        SimulationConfig::new(0.01, 10, 0),
        SimulationConfig::new(f64::NAN, 10, 2),
    ] {
        let err = scenario
            .clone()
            .into_state(&config)
            .expect_err("configuration must be rejected");
        assert!(matches!(err, SimError::InvalidConfiguration(_)), "{err}");
    }
}

#[test]
fn duplicate_body_ids_are_rejected() {
    let body = Body::new(1, Point2::ORIGIN, Vector2::ZERO, 1.0).expect("valid body");
    let err = SimulationState::new(
        vec![body.clone(), body],
        Boundary::centered(1.0).expect("bounds"),
        &SimulationConfig::default(),
    )
    .expect_err("ids must be unique");
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}
