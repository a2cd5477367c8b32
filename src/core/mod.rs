//! Core value types: vectors and points, bodies, the boundary, and the simulation state.

pub mod body;
pub mod state;
pub mod types;

pub use body::Body;
pub use state::SimulationState;
pub use types::{BodyId, Boundary, Point2, Vector2};
