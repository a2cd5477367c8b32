use std::thread;
use std::time::{Duration, Instant};

use log::{log_enabled, trace, warn, Level};

use crate::pipeline::task::PhaseKind;

/// Traces how long a worker thread spent on one phase task.
///
/// Started when the worker picks the task up; the trace line is emitted on drop.
pub struct TaskTimer {
    phase: PhaseKind,
    bodies: usize,
    start: Instant,
}

impl TaskTimer {
    pub fn new(phase: PhaseKind, bodies: usize) -> Self {
        if log_enabled!(Level::Trace) {
            trace!(
                "{phase} task picked up by {} ({bodies} bodies)",
                thread::current().name().unwrap_or("unnamed thread")
            );
        }
        Self {
            phase,
            bodies,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for TaskTimer {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            trace!(
                "{} task done: {} bodies in {} µs",
                self.phase,
                self.bodies,
                self.elapsed().as_micros()
            );
        }
    }
}

/// Warns when a single iteration took longer than `budget_ms`.
pub fn warn_if_iteration_budget_exceeded(iteration: u64, duration: Duration, budget_ms: f32) {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if elapsed_ms > budget_ms {
        warn!("Iteration {iteration} exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
    }
}
