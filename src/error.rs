use thiserror::Error;

use crate::core::types::BodyId;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while building or running a simulation pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Two bodies share a position, so the repulsive direction is undefined.
    /// Force summation treats this as a zero contribution.
    #[error("bodies {body} and {other} are coincident; repulsive force is undefined")]
    DegenerateDistance { body: BodyId, other: BodyId },

    /// Rejected construction parameters (mass, boundary, dt, iteration budget, workers).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A phase task could not be executed by the worker pool.
    #[error("worker unavailable: {0}")]
    WorkerUnavailable(String),

    /// A force evaluated to NaN or infinity.
    #[error("non-finite force computed for body {body}")]
    NonFiniteForce { body: BodyId },

    /// A task referenced bodies outside the snapshot it carries.
    #[error("invalid task: {0}")]
    InvalidTask(String),

    /// The coordinator thread panicked before producing a report.
    #[error("coordinator thread panicked")]
    CoordinatorPanicked,
}

impl SimError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_bodies() {
        let e = SimError::DegenerateDistance {
            body: BodyId(3),
            other: BodyId(7),
        };
        let msg = e.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('7'));
    }

    #[test]
    fn invalid_config_keeps_message() {
        let e = SimError::invalid_config("worker_count must be > 0");
        assert_eq!(
            e.to_string(),
            "invalid configuration: worker_count must be > 0"
        );
    }
}
