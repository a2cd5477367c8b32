use std::collections::BTreeMap;

use super::body::Body;
use super::types::{BodyId, Boundary};
use crate::config::SimulationConfig;
use crate::error::{Result, SimError};

/// Authoritative state of one simulation run.
///
/// Bodies are keyed by id; iteration follows ascending id, which fixes the
/// enumeration order used to derive partitions. Cloning produces a fully
/// independent snapshot.
#[derive(Debug, Clone)]
pub struct SimulationState {
    bodies: BTreeMap<BodyId, Body>,
    boundary: Boundary,
    dt: f64,
    max_iterations: u64,
    worker_count: usize,
    current_iteration: u64,
    virtual_time: f64,
}

impl SimulationState {
    /// Validates `config` and takes ownership of `bodies`. Duplicate ids are rejected.
    pub fn new<I>(bodies: I, boundary: Boundary, config: &SimulationConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Body>,
    {
        config.validate()?;
        let mut map = BTreeMap::new();
        for body in bodies {
            let id = body.id();
            if map.insert(id, body).is_some() {
                return Err(SimError::invalid_config(format!("duplicate body id {id}")));
            }
        }
        Ok(Self {
            bodies: map,
            boundary,
            dt: config.dt,
            max_iterations: config.max_iterations,
            worker_count: config.worker_count,
            current_iteration: 0,
            virtual_time: 0.0,
        })
    }

    /// Deep copy handed to workers and observers.
    pub fn snapshot(&self) -> SimulationState {
        self.clone()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Bodies in enumeration (ascending id) order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.values()
    }

    /// Owned copies of all bodies in enumeration order.
    pub fn bodies_in_order(&self) -> Vec<Body> {
        self.bodies.values().cloned().collect()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn current_iteration(&self) -> u64 {
        self.current_iteration
    }

    pub fn virtual_time(&self) -> f64 {
        self.virtual_time
    }

    /// True while the iteration budget is not exhausted.
    pub fn is_running(&self) -> bool {
        self.current_iteration < self.max_iterations
    }

    /// Replaces bodies by id, inserting those not yet present.
    pub fn merge<I>(&mut self, updated: I)
    where
        I: IntoIterator<Item = Body>,
    {
        for body in updated {
            self.bodies.insert(body.id(), body);
        }
    }

    /// Advances the iteration counter and virtual clock by one step.
    pub fn complete_iteration(&mut self) -> u64 {
        self.current_iteration += 1;
        self.virtual_time += self.dt;
        self.current_iteration
    }

    /// Field-wise equality of the body sets.
    pub fn same_bodies(&self, other: &SimulationState) -> bool {
        self.bodies.len() == other.bodies.len()
            && self
                .bodies
                .values()
                .zip(other.bodies.values())
                .all(|(a, b)| a.same_state(b))
    }
}
