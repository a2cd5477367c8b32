//! Utility helpers: per-task trace timers and per-phase profiling.

pub mod logging;
pub mod profiling;

pub use logging::TaskTimer;
pub use profiling::PipelineProfiler;
