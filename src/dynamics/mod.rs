//! Force laws and the partitioning of the body sequence across workers.

pub mod forces;
pub mod partition;

pub use forces::{friction, repulsion};
pub use partition::partition;
