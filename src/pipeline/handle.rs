use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};

use super::coordinator::{Coordinator, Message, RunReport};
use super::observer::{IterationObserver, SimulationView};
use super::worker::WorkerPool;
use crate::core::SimulationState;
use crate::error::{Result, SimError};

/// Builder that wires a simulation state, observers and a view into a running coordinator.
pub struct Pipeline {
    state: SimulationState,
    observers: Vec<IterationObserver>,
    view: Option<Box<dyn SimulationView>>,
    iteration_budget_ms: Option<f32>,
}

impl Pipeline {
    pub fn new(state: SimulationState) -> Self {
        Self {
            state,
            observers: Vec::new(),
            view: None,
            iteration_budget_ms: None,
        }
    }

    pub fn with_view<V>(mut self, view: V) -> Self
    where
        V: SimulationView + 'static,
    {
        self.view = Some(Box::new(view));
        self
    }

    pub fn on_iteration_complete<F>(mut self, observer: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn warn_over_budget(mut self, budget_ms: f32) -> Self {
        self.iteration_budget_ms = Some(budget_ms);
        self
    }

    /// Spawns the worker pool and the coordinator thread. The run waits for [`CoordinatorHandle::start`].
    pub fn launch(self) -> Result<CoordinatorHandle> {
        let (control_tx, control_rx) = unbounded();
        let (results_tx, results_rx) = unbounded();
        let pool = WorkerPool::new(self.state.worker_count(), results_tx)?;

        let mut coordinator = Coordinator::new(self.state, pool);
        for observer in self.observers {
            coordinator.add_observer(observer);
        }
        if let Some(view) = self.view {
            coordinator.attach_view(view);
        }
        if let Some(budget) = self.iteration_budget_ms {
            coordinator.set_iteration_budget(budget);
        }

        let thread = thread::Builder::new()
            .name("coordinator".to_string())
            .spawn(move || coordinator.run(control_rx, results_rx))
            .map_err(|e| SimError::WorkerUnavailable(format!("cannot spawn coordinator: {e}")))?;

        Ok(CoordinatorHandle {
            control: control_tx,
            thread: Some(thread),
        })
    }

    /// Launches, starts, and waits for the run to end.
    pub fn run(self) -> Result<RunReport> {
        let handle = self.launch()?;
        handle.start();
        handle.join()
    }
}

/// Control side of a launched coordinator.
///
/// Dropping the handle without joining stops the run.
pub struct CoordinatorHandle {
    control: Sender<Message>,
    thread: Option<JoinHandle<RunReport>>,
}

impl CoordinatorHandle {
    pub fn start(&self) {
        self.signal(Message::Start);
    }

    pub fn stop(&self) {
        self.signal(Message::Stop);
    }

    pub fn is_finished(&self) -> bool {
        self.thread
            .as_ref()
            .map(JoinHandle::is_finished)
            .unwrap_or(true)
    }

    /// Waits for termination. A failed run is returned as its error.
    pub fn join(mut self) -> Result<RunReport> {
        let thread = self.thread.take().ok_or(SimError::CoordinatorPanicked)?;
        let report = thread.join().map_err(|_| SimError::CoordinatorPanicked)?;
        report.into_result()
    }

    fn signal(&self, message: Message) {
        if self.control.send(message).is_err() {
            log::trace!("coordinator already terminated; signal dropped");
        }
    }
}
