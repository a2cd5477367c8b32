use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::SimulationState;

/// Callback run after every completed iteration with the new iteration number.
pub type IterationObserver = Box<dyn FnMut(u64) + Send>;

/// Receives one snapshot per completed iteration.
///
/// Implementations own the snapshot they are given and cannot reach the
/// coordinator's live state. `display` runs on the coordinator thread, so
/// slow views slow the run down.
pub trait SimulationView: Send {
    fn display(&mut self, snapshot: SimulationState);
}

impl<F> SimulationView for F
where
    F: FnMut(SimulationState) + Send,
{
    fn display(&mut self, snapshot: SimulationState) {
        self(snapshot)
    }
}

/// View that keeps only the most recent snapshot, readable from any thread.
#[derive(Clone, Default)]
pub struct LatestSnapshot {
    slot: Arc<RwLock<Option<SimulationState>>>,
}

impl LatestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the last displayed snapshot, if any.
    pub fn get(&self) -> Option<SimulationState> {
        self.slot.read().clone()
    }

    /// Iteration number of the last displayed snapshot, or 0.
    pub fn iteration(&self) -> u64 {
        self.slot
            .read()
            .as_ref()
            .map(SimulationState::current_iteration)
            .unwrap_or(0)
    }
}

impl SimulationView for LatestSnapshot {
    fn display(&mut self, snapshot: SimulationState) {
        *self.slot.write() = Some(snapshot);
    }
}
