use std::time::{Duration, Instant};

use body_pipeline::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut timings: Vec<(usize, u64, usize, Duration)> = Vec::new();
    for &bodies in &[100usize, 500, 1000] {
        let scenario = Scenario::custom(bodies, 1)?;
        for &iterations in &[100u64, 200] {
            for &workers in &[1usize, 2, 4, 8, 16] {
                let config = SimulationConfig::new(0.01, iterations, workers);
                let started = Instant::now();
                Pipeline::new(scenario.clone().into_state(&config)?)
                    .on_iteration_complete(move |iteration| {
                        if iteration % 50 == 0 {
                            log::info!("{bodies} bodies / {workers} workers: iteration {iteration}");
                        }
                    })
                    .run()?;
                timings.push((bodies, iterations, workers, started.elapsed()));
            }
        }
    }

    timings.sort_by_key(|&(_, _, _, elapsed)| elapsed);
    println!(
        "{:>8} {:>10} {:>8} {:>12}",
        "bodies", "iterations", "workers", "time (ms)"
    );
    for (bodies, iterations, workers, elapsed) in timings {
        println!(
            "{bodies:>8} {iterations:>10} {workers:>8} {:>12.2}",
            elapsed.as_secs_f64() * 1000.0
        );
    }
    Ok(())
}
