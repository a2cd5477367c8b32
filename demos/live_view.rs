use std::thread;
use std::time::Duration;

use body_pipeline::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimulationConfig::with_available_parallelism().max_iterations(1_000_000);
    let view = LatestSnapshot::new();
    let handle = Pipeline::new(Scenario::many_bodies(7)?.into_state(&config)?)
        .with_view(view.clone())
        .warn_over_budget(50.0)
        .launch()?;

    handle.start();
    for _ in 0..10 {
        thread::sleep(Duration::from_millis(200));
        if let Some(snapshot) = view.get() {
            let (min_x, max_x) = snapshot
                .bodies()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), body| {
                    (lo.min(body.position.x), hi.max(body.position.x))
                });
            println!(
                "iteration {:>6}  t = {:>7.2}  x in [{min_x:.3}, {max_x:.3}]",
                snapshot.current_iteration(),
                snapshot.virtual_time()
            );
        }
    }

    handle.stop();
    let report = handle.join()?;
    println!(
        "{:?} after {} iterations",
        report.termination, report.iterations_completed
    );
    report.profile.report();
    Ok(())
}
