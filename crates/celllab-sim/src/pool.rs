//! Shared worker pool backing all background simulation work.
//!
//! One bounded pool serves the background stepping task, asynchronous
//! reset/clear submissions, and the work splitter's row partitions. The
//! pool exposes the core/max thread-count knobs the engine surfaces to
//! callers; `core` is the liveness guarantee the splitter's readiness
//! check consults, `max` bounds how many workers a partitioned compute
//! may claim.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{SimError, SimResult};

/// Bounded worker pool for background stepping, async fills and row
/// partitions.
pub struct WorkerPool {
    pool: RwLock<Arc<ThreadPool>>,
    core_threads: AtomicUsize,
    max_threads: AtomicUsize,
    shutdown: AtomicBool,
}

fn build_pool(threads: usize) -> SimResult<Arc<ThreadPool>> {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("celllab-worker-{i}"))
        .build()
        .map(Arc::new)
        .map_err(|e| SimError::PoolBuild(e.to_string()))
}

impl WorkerPool {
    /// Creates a pool with explicit thread counts, `1 <= core <= max`.
    pub fn new(core_threads: usize, max_threads: usize) -> SimResult<Self> {
        if core_threads < 1 || max_threads < core_threads {
            return Err(SimError::InvalidThreadCount {
                core: core_threads,
                max: max_threads,
            });
        }

        debug!(core_threads, max_threads, "building worker pool");
        Ok(Self {
            pool: RwLock::new(build_pool(max_threads)?),
            core_threads: AtomicUsize::new(core_threads),
            max_threads: AtomicUsize::new(max_threads),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Creates a pool sized for the host: one core thread per logical
    /// core and twice that as the maximum.
    pub fn with_host_sizing() -> SimResult<Self> {
        let cores = num_cpus::get().max(1);
        Self::new(cores, cores * 2)
    }

    /// Number of threads kept alive regardless of load.
    pub fn core_threads(&self) -> usize {
        self.core_threads.load(Ordering::Acquire)
    }

    /// Maximum number of threads the pool may run.
    pub fn max_threads(&self) -> usize {
        self.max_threads.load(Ordering::Acquire)
    }

    /// Sets the core thread count. Returns whether the value changed.
    pub fn set_core_threads(&self, core_threads: usize) -> SimResult<bool> {
        let max = self.max_threads();
        if core_threads < 1 || core_threads > max {
            return Err(SimError::InvalidThreadCount {
                core: core_threads,
                max,
            });
        }

        let prev = self.core_threads.swap(core_threads, Ordering::AcqRel);
        Ok(prev != core_threads)
    }

    /// Sets the maximum thread count, rebuilding the pool when it
    /// changes. Returns whether the value changed.
    ///
    /// Tasks already running continue on the previous pool's threads
    /// until they finish; new submissions land on the rebuilt pool.
    pub fn set_max_threads(&self, max_threads: usize) -> SimResult<bool> {
        let core = self.core_threads();
        if max_threads < 1 || max_threads < core {
            return Err(SimError::InvalidThreadCount {
                core,
                max: max_threads,
            });
        }

        if self.max_threads.load(Ordering::Acquire) == max_threads {
            return Ok(false);
        }

        let rebuilt = build_pool(max_threads)?;
        *self.pool.write() = rebuilt;
        self.max_threads.store(max_threads, Ordering::Release);
        debug!(max_threads, "worker pool rebuilt");
        Ok(true)
    }

    /// Marks the pool as shut down; readiness checks fail afterwards.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Whether the pool has been shut down.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Whether the pool is sized for partitioned compute: at least 2 core
    /// threads and 3 max threads, a guard against oversubscribing trivial
    /// pools where one thread may be pinned by the stepping task.
    pub fn is_parallel_ready(&self) -> bool {
        !self.is_shutdown() && self.core_threads() >= 2 && self.max_threads() >= 3
    }

    /// Submits a one-shot task.
    pub fn spawn(&self, task: impl FnOnce() + Send + 'static) {
        self.handle().spawn(task);
    }

    /// Current pool handle, for blocking fan-out via [`ThreadPool::scope`].
    pub fn handle(&self) -> Arc<ThreadPool> {
        self.pool.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_sizing_validation() {
        assert!(matches!(
            WorkerPool::new(0, 4),
            Err(SimError::InvalidThreadCount { .. })
        ));
        assert!(matches!(
            WorkerPool::new(4, 2),
            Err(SimError::InvalidThreadCount { .. })
        ));
        assert!(WorkerPool::new(1, 1).is_ok());
    }

    #[test]
    fn test_set_thread_counts() {
        let pool = WorkerPool::new(2, 4).unwrap();

        assert!(pool.set_core_threads(3).unwrap());
        assert!(!pool.set_core_threads(3).unwrap());
        assert_eq!(pool.core_threads(), 3);

        assert!(matches!(
            pool.set_core_threads(5),
            Err(SimError::InvalidThreadCount { .. })
        ));
        assert!(matches!(
            pool.set_max_threads(2),
            Err(SimError::InvalidThreadCount { .. })
        ));

        assert!(pool.set_max_threads(8).unwrap());
        assert_eq!(pool.max_threads(), 8);
    }

    #[test]
    fn test_parallel_readiness() {
        let pool = WorkerPool::new(2, 3).unwrap();
        assert!(pool.is_parallel_ready());

        let small = WorkerPool::new(1, 3).unwrap();
        assert!(!small.is_parallel_ready());

        let narrow = WorkerPool::new(2, 2).unwrap();
        assert!(!narrow.is_parallel_ready());

        pool.shutdown();
        assert!(!pool.is_parallel_ready());
    }

    #[test]
    fn test_spawn_runs() {
        let pool = WorkerPool::new(1, 2).unwrap();
        let (tx, rx) = mpsc::channel();
        pool.spawn(move || tx.send(42).unwrap());
        assert_eq!(rx.recv().unwrap(), 42);
    }
}
