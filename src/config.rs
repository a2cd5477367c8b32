//! Global configuration constants and run parameters for the body pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Scale of the inverse-square repulsion between two bodies.
pub const REPULSIVE_CONST: f64 = 0.01;

/// Linear friction coefficient opposing each body's velocity.
pub const FRICTION_CONST: f64 = 1.0;

/// Default integration timestep (virtual seconds per iteration).
pub const DEFAULT_TIME_STEP: f64 = 0.01;

/// Default iteration budget for a run.
pub const DEFAULT_MAX_ITERATIONS: u64 = 3000;

/// Default number of partitions / worker threads.
pub const DEFAULT_WORKER_COUNT: usize = 10;

/// Run parameters handed to [`crate::core::state::SimulationState`] at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub dt: f64,
    pub max_iterations: u64,
    pub worker_count: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_TIME_STEP,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            worker_count: DEFAULT_WORKER_COUNT,
        }
    }
}

impl SimulationConfig {
    pub fn new(dt: f64, max_iterations: u64, worker_count: usize) -> Self {
        Self {
            dt,
            max_iterations,
            worker_count,
        }
    }

    /// One worker per available core, plus one.
    pub fn with_available_parallelism() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            worker_count: cores + 1,
            ..Self::default()
        }
    }

    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::invalid_config(format!(
                "dt must be a positive finite number, got {}",
                self.dt
            )));
        }
        if self.max_iterations == 0 {
            return Err(SimError::invalid_config("max_iterations must be > 0"));
        }
        if self.worker_count == 0 {
            return Err(SimError::invalid_config("worker_count must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(SimulationConfig::with_available_parallelism()
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let base = SimulationConfig::default();
        assert!(base.dt(0.0).validate().is_err());
        assert!(base.dt(f64::NAN).validate().is_err());
        assert!(base.max_iterations(0).validate().is_err());
        assert!(base.worker_count(0).validate().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: SimulationConfig =
            serde_json::from_str(r#"{ "worker_count": 4 }"#).expect("valid json");
        assert_eq!(cfg.worker_count, 4);
        assert_eq!(cfg.dt, DEFAULT_TIME_STEP);
        assert_eq!(cfg.max_iterations, DEFAULT_MAX_ITERATIONS);
    }
}
