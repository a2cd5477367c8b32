use body_pipeline::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimulationConfig::default().max_iterations(300).worker_count(2);
    let report = Pipeline::new(Scenario::two_bodies()?.into_state(&config)?)
        .on_iteration_complete(|iteration| {
            if iteration % 100 == 0 {
                log::info!("iteration {iteration}");
            }
        })
        .run()?;

    println!(
        "{:?} after {} iterations ({:.2} virtual s)",
        report.termination, report.iterations_completed, report.virtual_time
    );
    for body in report.final_state.bodies() {
        println!(
            "body {} (m = {}): position ({:.5}, {:.5}) velocity ({:.5}, {:.5})",
            body.id(),
            body.mass(),
            body.position.x,
            body.position.y,
            body.velocity.x,
            body.velocity.y
        );
    }
    report.profile.report();
    Ok(())
}
