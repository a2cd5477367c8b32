use std::time::Duration;

use crate::pipeline::task::PhaseKind;

/// Wall-clock time spent in each phase of a run, measured from dispatch to barrier.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineProfiler {
    pub velocity_time: Duration,
    pub position_time: Duration,
    pub collision_time: Duration,
    pub total_time: Duration,

    pub iterations: u64,
    pub tasks_dispatched: u64,
}

impl PipelineProfiler {
    pub fn record_phase(&mut self, phase: PhaseKind, elapsed: Duration) {
        match phase {
            PhaseKind::Velocity => self.velocity_time += elapsed,
            PhaseKind::Position => self.position_time += elapsed,
            PhaseKind::Collision => self.collision_time += elapsed,
        }
    }

    pub fn phase_time(&self, phase: PhaseKind) -> Duration {
        match phase {
            PhaseKind::Velocity => self.velocity_time,
            PhaseKind::Position => self.position_time,
            PhaseKind::Collision => self.collision_time,
        }
    }

    /// Mean wall time per completed iteration.
    pub fn mean_iteration_time(&self) -> Duration {
        if self.iterations == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.total_time.as_secs_f64() / self.iterations as f64)
    }

    pub fn report(&self) {
        let total_us = self.total_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        println!("--- Pipeline Profile ---");
        println!(
            "Iterations: {}, Tasks: {}",
            self.iterations, self.tasks_dispatched
        );
        println!("Total: {:.2} ms", self.total_time.as_secs_f32() * 1000.0);
        println!(
            "Mean iteration: {:.3} ms",
            self.mean_iteration_time().as_secs_f64() * 1000.0
        );
        for phase in PhaseKind::ALL {
            let time = self.phase_time(phase);
            println!(
                "  {:<10} {:.2} ms ({:.1}%)",
                phase.label(),
                time.as_secs_f32() * 1000.0,
                (time.as_micros() as f32 / total_us) * 100.0
            );
        }
        println!("------------------------");
    }
}
