//! Coordinator/worker iteration pipeline: tasks, the worker pool, the phase
//! state machine, and the surfaces exposed to drivers and views.

pub mod coordinator;
pub mod handle;
pub mod observer;
pub mod task;
pub mod worker;

pub use coordinator::{Coordinator, CoordinatorState, Message, RunReport, Termination};
pub use handle::{CoordinatorHandle, Pipeline};
pub use observer::{IterationObserver, LatestSnapshot, SimulationView};
pub use task::{Job, PhaseKind, PhaseResult, Task, Worker};
pub use worker::{Dispatcher, WorkerPool};
