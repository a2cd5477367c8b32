use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::core::{Body, Boundary};
use crate::error::{Result, SimError};
use crate::utils::logging::TaskTimer;

/// The three synchronised steps of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Velocity,
    Position,
    Collision,
}

impl PhaseKind {
    pub const ALL: [PhaseKind; 3] = [Self::Velocity, Self::Position, Self::Collision];

    pub fn label(self) -> &'static str {
        match self {
            Self::Velocity => "velocity",
            Self::Position => "position",
            Self::Collision => "collision",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unit of work for one partition in one phase.
///
/// Every payload is owned by the task. The velocity snapshot is shared
/// read-only between the tasks of a single phase; workers clone the bodies
/// they update out of it.
#[derive(Debug, Clone)]
pub enum Task {
    /// Recompute acceleration and velocity for `snapshot[range]` against the whole snapshot.
    Velocity {
        snapshot: Arc<Vec<Body>>,
        dt: f64,
        range: Range<usize>,
    },
    /// Advance the positions of `bodies` by one step.
    Position { bodies: Vec<Body>, dt: f64 },
    /// Clamp `bodies` into `boundary`.
    Collision { bodies: Vec<Body>, boundary: Boundary },
}

impl Task {
    pub fn phase(&self) -> PhaseKind {
        match self {
            Task::Velocity { .. } => PhaseKind::Velocity,
            Task::Position { .. } => PhaseKind::Position,
            Task::Collision { .. } => PhaseKind::Collision,
        }
    }

    /// Number of bodies this task will return.
    pub fn len(&self) -> usize {
        match self {
            Task::Velocity { range, .. } => range.len(),
            Task::Position { bodies, .. } | Task::Collision { bodies, .. } => bodies.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A task addressed to the pool, tagged with where it belongs in the run.
#[derive(Debug, Clone)]
pub struct Job {
    pub iteration: u64,
    pub partition: usize,
    pub task: Task,
}

impl Job {
    pub fn phase(&self) -> PhaseKind {
        self.task.phase()
    }

    /// Executes the task and wraps the outcome with this job's tag.
    pub fn run(self) -> PhaseResult {
        let phase = self.phase();
        PhaseResult {
            iteration: self.iteration,
            phase,
            partition: self.partition,
            outcome: Worker::execute(self.task),
        }
    }
}

/// Updated bodies (or the failure) for one job.
#[derive(Debug, Clone)]
pub struct PhaseResult {
    pub iteration: u64,
    pub phase: PhaseKind,
    pub partition: usize,
    pub outcome: Result<Vec<Body>>,
}

/// Stateless executor of phase tasks.
///
/// All mutation happens on the task's own copies; the updated bodies are
/// the only output.
pub struct Worker;

impl Worker {
    pub fn execute(task: Task) -> Result<Vec<Body>> {
        match task {
            Task::Velocity {
                snapshot,
                dt,
                range,
            } => {
                let _timer = TaskTimer::new(PhaseKind::Velocity, range.len());
                let slice = snapshot.get(range.clone()).ok_or_else(|| {
                    SimError::InvalidTask(format!(
                        "range {}..{} outside snapshot of {} bodies",
                        range.start,
                        range.end,
                        snapshot.len()
                    ))
                })?;
                slice
                    .iter()
                    .map(|body| -> Result<Body> {
                        let mut updated = body.clone();
                        let force = updated.total_force(snapshot.iter())?;
                        updated.update_acceleration(force);
                        updated.update_velocity(dt);
                        Ok(updated)
                    })
                    .collect()
            }
            Task::Position { mut bodies, dt } => {
                let _timer = TaskTimer::new(PhaseKind::Position, bodies.len());
                for body in &mut bodies {
                    body.update_position(dt);
                }
                Ok(bodies)
            }
            Task::Collision {
                mut bodies,
                boundary,
            } => {
                let _timer = TaskTimer::new(PhaseKind::Collision, bodies.len());
                for body in &mut bodies {
                    body.resolve_boundary_collision(&boundary);
                }
                Ok(bodies)
            }
        }
    }
}
