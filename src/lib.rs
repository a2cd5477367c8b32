//! Body Pipeline – concurrent N-body repulsion simulator.
//!
//! A coordinator owns the simulation state and advances it one iteration at
//! a time through three barrier-synchronised phases (velocity, position,
//! collision). Each phase is split into contiguous partitions of the body
//! sequence and handed to a fixed pool of stateless workers as owned
//! snapshots; results are merged back by body id once every partition has
//! reported.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod pipeline;
pub mod scenario;
pub mod utils;

pub use glam::DVec2;

pub use config::SimulationConfig;
pub use crate::core::{Body, BodyId, Boundary, Point2, SimulationState, Vector2};
pub use dynamics::partition;
pub use error::{Result, SimError};
pub use pipeline::{
    Coordinator, CoordinatorHandle, CoordinatorState, Dispatcher, Job, LatestSnapshot, Message,
    PhaseKind, PhaseResult, Pipeline, RunReport, SimulationView, Task, Termination, Worker,
    WorkerPool,
};
pub use scenario::Scenario;
pub use utils::profiling::PipelineProfiler;

/// Validates a scenario against `config` and runs it to completion on a fresh worker pool.
pub fn simulate(scenario: Scenario, config: &SimulationConfig) -> Result<RunReport> {
    let state = scenario.into_state(config)?;
    Pipeline::new(state).run()
}
