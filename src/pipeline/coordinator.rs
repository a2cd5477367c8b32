use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{select, Receiver, TryRecvError};

use super::observer::{IterationObserver, SimulationView};
use super::task::{Job, PhaseKind, PhaseResult, Task};
use super::worker::Dispatcher;
use crate::core::{Body, SimulationState};
use crate::dynamics::partition;
use crate::error::{Result, SimError};
use crate::utils::logging::warn_if_iteration_budget_exceeded;
use crate::utils::profiling::PipelineProfiler;

/// States of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Awaiting,
    UpdatingVelocities,
    UpdatingPositions,
    CheckingCollisions,
    Terminated,
}

impl CoordinatorState {
    /// Phase whose results this state is waiting for.
    pub fn phase(self) -> Option<PhaseKind> {
        match self {
            Self::UpdatingVelocities => Some(PhaseKind::Velocity),
            Self::UpdatingPositions => Some(PhaseKind::Position),
            Self::CheckingCollisions => Some(PhaseKind::Collision),
            Self::Awaiting | Self::Terminated => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Terminated
    }
}

impl From<PhaseKind> for CoordinatorState {
    fn from(phase: PhaseKind) -> Self {
        match phase {
            PhaseKind::Velocity => Self::UpdatingVelocities,
            PhaseKind::Position => Self::UpdatingPositions,
            PhaseKind::Collision => Self::CheckingCollisions,
        }
    }
}

/// Input accepted by the coordinator.
#[derive(Debug)]
pub enum Message {
    Start,
    Stop,
    Completed(PhaseResult),
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// The iteration budget was exhausted.
    Completed,
    /// A Stop signal arrived first.
    Stopped,
    /// A phase could not be carried out; the state is not meaningful.
    Failed(SimError),
}

/// Outcome of a run as seen by the launching driver.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub termination: Termination,
    pub iterations_completed: u64,
    pub virtual_time: f64,
    pub final_state: SimulationState,
    pub profile: PipelineProfiler,
}

impl RunReport {
    /// Turns a failed run into its error.
    pub fn into_result(self) -> Result<RunReport> {
        match self.termination {
            Termination::Failed(e) => Err(e),
            _ => Ok(self),
        }
    }
}

/// Finite-state machine driving the velocity, position and collision phases.
///
/// The coordinator is the only writer of its [`SimulationState`]. Each phase
/// dispatches one job per non-empty partition and advances only once every
/// outstanding partition has reported back.
pub struct Coordinator<D: Dispatcher> {
    state: SimulationState,
    status: CoordinatorState,
    outstanding: BTreeSet<usize>,
    deferred: Option<PhaseKind>,
    dispatcher: Option<D>,
    observers: Vec<IterationObserver>,
    view: Option<Box<dyn SimulationView>>,
    profile: PipelineProfiler,
    run_started: Option<Instant>,
    phase_started: Option<Instant>,
    iteration_started: Option<Instant>,
    iteration_budget_ms: Option<f32>,
    termination: Option<Termination>,
}

impl<D: Dispatcher> Coordinator<D> {
    pub fn new(state: SimulationState, dispatcher: D) -> Self {
        Self {
            state,
            status: CoordinatorState::Awaiting,
            outstanding: BTreeSet::new(),
            deferred: None,
            dispatcher: Some(dispatcher),
            observers: Vec::new(),
            view: None,
            profile: PipelineProfiler::default(),
            run_started: None,
            phase_started: None,
            iteration_started: None,
            iteration_budget_ms: None,
            termination: None,
        }
    }

    /// Registers a callback run, in registration order, after each iteration.
    pub fn on_iteration_complete<F>(&mut self, observer: F)
    where
        F: FnMut(u64) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub(crate) fn add_observer(&mut self, observer: IterationObserver) {
        self.observers.push(observer);
    }

    pub fn attach_view(&mut self, view: Box<dyn SimulationView>) {
        self.view = Some(view);
    }

    /// Logs a warning for every iteration slower than `budget_ms`.
    pub fn set_iteration_budget(&mut self, budget_ms: f32) {
        self.iteration_budget_ms = Some(budget_ms);
    }

    pub fn status(&self) -> CoordinatorState {
        self.status
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Number of partitions of the current phase still to report.
    pub fn pending(&self) -> usize {
        self.outstanding.len()
    }

    /// True when an iteration with nothing to dispatch finished and the next
    /// one waits for [`Coordinator::advance`].
    pub fn has_pending_advance(&self) -> bool {
        self.deferred.is_some()
    }

    /// Enters the phase left pending by an iteration that dispatched no jobs.
    pub fn advance(&mut self) -> CoordinatorState {
        if let Some(phase) = self.deferred.take() {
            if !self.status.is_terminal() {
                self.enter_phase(phase);
            }
        }
        self.status
    }

    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    pub fn profile(&self) -> &PipelineProfiler {
        &self.profile
    }

    pub fn dispatcher(&self) -> Option<&D> {
        self.dispatcher.as_ref()
    }

    pub fn dispatcher_mut(&mut self) -> Option<&mut D> {
        self.dispatcher.as_mut()
    }

    /// Processes one message and returns the resulting state.
    pub fn handle(&mut self, message: Message) -> CoordinatorState {
        match (self.status, message) {
            (CoordinatorState::Terminated, message) => {
                log::trace!("coordinator terminated, ignoring {message:?}");
            }
            (_, Message::Stop) => self.terminate(Termination::Stopped),
            (CoordinatorState::Awaiting, Message::Start) => {
                log::info!(
                    "starting simulation: {} bodies, {} workers, {} iterations",
                    self.state.body_count(),
                    self.state.worker_count(),
                    self.state.max_iterations()
                );
                self.run_started = Some(Instant::now());
                self.enter_phase(PhaseKind::Velocity);
            }
            (status, Message::Start) => {
                log::warn!("start signal ignored in state {status:?}");
            }
            (CoordinatorState::Awaiting, Message::Completed(result)) => {
                log::warn!(
                    "unexpected {} result before start (partition {})",
                    result.phase,
                    result.partition
                );
            }
            (_, Message::Completed(result)) => self.on_result(result),
        }
        self.status
    }

    /// Runs the mailbox loop until termination.
    ///
    /// Pending control signals are drained before every wait so a queued
    /// Stop is seen ahead of queued results, and between iterations that
    /// had no jobs to wait for. Losing every control sender counts as Stop.
    pub fn run(mut self, control: Receiver<Message>, results: Receiver<PhaseResult>) -> RunReport {
        while !self.status.is_terminal() {
            match control.try_recv() {
                Ok(message) => {
                    self.handle(message);
                    continue;
                }
                Err(TryRecvError::Disconnected) => {
                    self.handle(Message::Stop);
                    continue;
                }
                Err(TryRecvError::Empty) => {}
            }

            if self.deferred.is_some() {
                self.advance();
                continue;
            }

            select! {
                recv(control) -> message => {
                    self.handle(message.unwrap_or(Message::Stop));
                }
                recv(results) -> result => match result {
                    Ok(result) => {
                        self.handle(Message::Completed(result));
                    }
                    Err(_) => self.terminate(Termination::Failed(SimError::WorkerUnavailable(
                        "result channel closed".to_string(),
                    ))),
                },
            }
        }
        self.into_report()
    }

    pub fn into_report(self) -> RunReport {
        RunReport {
            termination: self.termination.unwrap_or(Termination::Stopped),
            iterations_completed: self.state.current_iteration(),
            virtual_time: self.state.virtual_time(),
            final_state: self.state,
            profile: self.profile,
        }
    }

    fn on_result(&mut self, result: PhaseResult) {
        let Some(phase) = self.status.phase() else {
            return;
        };
        if result.phase != phase || result.iteration != self.state.current_iteration() {
            log::warn!(
                "discarding stale {} result for iteration {} (awaiting {} of iteration {})",
                result.phase,
                result.iteration,
                phase,
                self.state.current_iteration()
            );
            return;
        }
        if !self.outstanding.remove(&result.partition) {
            log::warn!(
                "discarding duplicate {} result for partition {}",
                phase,
                result.partition
            );
            return;
        }

        match result.outcome {
            Ok(bodies) => self.state.merge(bodies),
            Err(e) => {
                self.terminate(Termination::Failed(e));
                return;
            }
        }

        if self.outstanding.is_empty() {
            if let Some(next) = self.finish_phase(phase) {
                self.enter_phase(next);
            }
        }
    }

    /// Dispatches `first` and keeps advancing through phases that had nothing to wait for.
    ///
    /// Stops at the end of an iteration without jobs and leaves the next one
    /// in `deferred`, so the mailbox is polled once per iteration.
    fn enter_phase(&mut self, first: PhaseKind) {
        let mut next = Some(first);
        while let Some(phase) = next {
            self.status = phase.into();
            let now = Instant::now();
            self.phase_started = Some(now);
            if phase == PhaseKind::Velocity {
                self.iteration_started = Some(now);
            }
            log::debug!(
                "iteration {}: entering {:?}",
                self.state.current_iteration() + 1,
                self.status
            );

            match self.dispatch_phase(phase) {
                Ok(0) => {
                    next = self.finish_phase(phase);
                    if phase == PhaseKind::Collision {
                        if let Some(pending) = next.take() {
                            self.status = pending.into();
                            self.deferred = Some(pending);
                        }
                    }
                }
                Ok(_) => return,
                Err(e) => {
                    self.terminate(Termination::Failed(e));
                    return;
                }
            }
        }
    }

    /// Sends one job per non-empty partition of a fresh snapshot; returns how many were sent.
    fn dispatch_phase(&mut self, phase: PhaseKind) -> Result<usize> {
        let iteration = self.state.current_iteration();
        let dt = self.state.dt();
        let boundary = self.state.boundary();
        let bodies = self.state.bodies_in_order();
        let ranges = partition(bodies.len(), self.state.worker_count());
        let dispatcher = self
            .dispatcher
            .as_mut()
            .ok_or_else(|| SimError::WorkerUnavailable("worker pool released".to_string()))?;

        self.outstanding.clear();
        match phase {
            PhaseKind::Velocity => {
                let snapshot = Arc::new(bodies);
                for (partition, range) in ranges.into_iter().enumerate() {
                    if range.is_empty() {
                        continue;
                    }
                    dispatcher.dispatch(Job {
                        iteration,
                        partition,
                        task: Task::Velocity {
                            snapshot: Arc::clone(&snapshot),
                            dt,
                            range,
                        },
                    })?;
                    self.outstanding.insert(partition);
                }
            }
            PhaseKind::Position | PhaseKind::Collision => {
                let mut remaining = bodies.into_iter();
                for (partition, range) in ranges.into_iter().enumerate() {
                    let chunk: Vec<Body> = remaining.by_ref().take(range.len()).collect();
                    if chunk.is_empty() {
                        continue;
                    }
                    let task = if phase == PhaseKind::Position {
                        Task::Position { bodies: chunk, dt }
                    } else {
                        Task::Collision {
                            bodies: chunk,
                            boundary,
                        }
                    };
                    dispatcher.dispatch(Job {
                        iteration,
                        partition,
                        task,
                    })?;
                    self.outstanding.insert(partition);
                }
            }
        }

        let sent = self.outstanding.len();
        self.profile.tasks_dispatched += sent as u64;
        log::debug!("dispatched {sent} {phase} jobs via {}", dispatcher.name());
        Ok(sent)
    }

    /// Barrier passed for `phase`: returns the phase to enter next, if any.
    fn finish_phase(&mut self, phase: PhaseKind) -> Option<PhaseKind> {
        if let Some(started) = self.phase_started.take() {
            self.profile.record_phase(phase, started.elapsed());
        }
        match phase {
            PhaseKind::Velocity => Some(PhaseKind::Position),
            PhaseKind::Position => Some(PhaseKind::Collision),
            PhaseKind::Collision => {
                self.complete_iteration();
                if self.state.is_running() {
                    Some(PhaseKind::Velocity)
                } else {
                    self.terminate(Termination::Completed);
                    None
                }
            }
        }
    }

    fn complete_iteration(&mut self) {
        let iteration = self.state.complete_iteration();
        self.profile.iterations += 1;
        if let (Some(budget), Some(started)) =
            (self.iteration_budget_ms, self.iteration_started.take())
        {
            warn_if_iteration_budget_exceeded(iteration, started.elapsed(), budget);
        }
        for observer in &mut self.observers {
            observer(iteration);
        }
        if let Some(view) = self.view.as_mut() {
            view.display(self.state.snapshot());
        }
    }

    fn terminate(&mut self, termination: Termination) {
        if self.status.is_terminal() {
            return;
        }
        self.status = CoordinatorState::Terminated;
        self.outstanding.clear();
        self.deferred = None;
        if let Some(started) = self.run_started {
            self.profile.total_time = started.elapsed();
        }
        match &termination {
            Termination::Completed => log::info!(
                "simulation completed {} iterations ({:.3} virtual s)",
                self.state.current_iteration(),
                self.state.virtual_time()
            ),
            Termination::Stopped => log::info!(
                "simulation stopped after {} iterations",
                self.state.current_iteration()
            ),
            Termination::Failed(e) => log::error!(
                "simulation failed during iteration {}: {e}",
                self.state.current_iteration() + 1
            ),
        }
        self.termination = Some(termination);
        self.dispatcher = None;
    }
}
