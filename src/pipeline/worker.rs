use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::Sender;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::task::{Job, PhaseKind, PhaseResult};
use crate::error::{Result, SimError};

/// Backend that executes jobs on behalf of the coordinator.
///
/// `dispatch` must not wait for the job to finish; the outcome is delivered
/// later as a [`PhaseResult`] through whatever channel the backend was built with.
pub trait Dispatcher: Send {
    fn dispatch(&mut self, job: Job) -> Result<()>;

    fn name(&self) -> &str {
        "dispatcher"
    }
}

/// Fixed-size pool of worker threads fed from a shared work queue.
pub struct WorkerPool {
    pool: ThreadPool,
    results: Sender<PhaseResult>,
    size: usize,
}

impl WorkerPool {
    /// Spawns `size` named worker threads that report to `results`.
    pub fn new(size: usize, results: Sender<PhaseResult>) -> Result<Self> {
        if size == 0 {
            return Err(SimError::invalid_config("worker pool needs at least one thread"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("body-worker-{i}"))
            .build()
            .map_err(|e| SimError::WorkerUnavailable(e.to_string()))?;
        log::debug!("worker pool started with {size} threads");
        Ok(Self {
            pool,
            results,
            size,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `work` on the pool and forwards its result. A panic inside `work`
    /// is reported as [`SimError::WorkerUnavailable`] for the same tag.
    fn spawn_guarded<F>(&self, iteration: u64, phase: PhaseKind, partition: usize, work: F)
    where
        F: FnOnce() -> PhaseResult + Send + 'static,
    {
        let results = self.results.clone();
        self.pool.spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|_| {
                log::error!("worker panicked on {phase} partition {partition}");
                PhaseResult {
                    iteration,
                    phase,
                    partition,
                    outcome: Err(SimError::WorkerUnavailable(format!(
                        "worker panicked on {phase} partition {partition}"
                    ))),
                }
            });
            if results.send(result).is_err() {
                log::trace!("coordinator gone, dropping {phase} result for partition {partition}");
            }
        });
    }
}

impl Dispatcher for WorkerPool {
    fn dispatch(&mut self, job: Job) -> Result<()> {
        let (iteration, phase, partition) = (job.iteration, job.phase(), job.partition);
        self.spawn_guarded(iteration, phase, partition, move || job.run());
        Ok(())
    }

    fn name(&self) -> &str {
        "rayon-pool"
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        log::debug!("worker pool with {} threads released", self.size);
    }
}
