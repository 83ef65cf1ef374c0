//! Row-range work splitting for parallel transition compute.
//!
//! The splitter decides how many row partitions one transition step gets
//! and dispatches them over the worker pool. Partitions write disjoint
//! [`RowBand`]s of the scratch grid, so no synchronization happens inside
//! a step; the whole partitioned compute runs within the engine's state
//! critical section.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::warn;

use celllab_core::{Grid, RowBand};

use crate::pool::WorkerPool;

/// Default minimum cell budget per worker thread.
pub const DEF_MIN_CELLS_PER_THREAD: usize = 10_000;

/// Splits transition compute into contiguous row partitions.
pub struct WorkSplitter {
    parallel_enabled: AtomicBool,
    min_cells_per_thread: AtomicUsize,
}

impl WorkSplitter {
    /// Creates a splitter with explicit knobs.
    pub fn new(parallel_enabled: bool, min_cells_per_thread: usize) -> Self {
        Self {
            parallel_enabled: AtomicBool::new(parallel_enabled),
            min_cells_per_thread: AtomicUsize::new(min_cells_per_thread.max(1)),
        }
    }

    /// Whether parallel compute is enabled.
    pub fn is_parallel_enabled(&self) -> bool {
        self.parallel_enabled.load(Ordering::Acquire)
    }

    /// Enables or disables parallel compute. Returns whether the value
    /// changed.
    pub fn set_parallel_enabled(&self, enabled: bool) -> bool {
        self.parallel_enabled.swap(enabled, Ordering::AcqRel) != enabled
    }

    /// Minimum cell budget per worker.
    pub fn min_cells_per_thread(&self) -> usize {
        self.min_cells_per_thread.load(Ordering::Acquire)
    }

    /// Sets the per-worker cell budget (clamped to at least 1). Returns
    /// whether the value changed.
    pub fn set_min_cells_per_thread(&self, min_cells: usize) -> bool {
        let min_cells = min_cells.max(1);
        self.min_cells_per_thread.swap(min_cells, Ordering::AcqRel) != min_cells
    }

    /// Number of workers a compute over `total_cells` cells in
    /// `total_rows` rows would use.
    ///
    /// Returns 1 (serial) when parallelism is disabled, no pool is given,
    /// the pool is not parallel-ready, or the grid is below the cell
    /// budget. Otherwise one worker per `min_cells_per_thread` cells,
    /// capped at `max_threads - 1` and at the row count.
    pub fn worker_count(
        &self,
        pool: Option<&WorkerPool>,
        total_cells: usize,
        total_rows: usize,
    ) -> usize {
        let min_cells = self.min_cells_per_thread();

        let Some(pool) = pool else { return 1 };
        if !self.is_parallel_enabled() || total_cells <= min_cells || !pool.is_parallel_ready() {
            return 1;
        }

        let workers = (total_cells / min_cells).min(pool.max_threads() - 1);
        workers.min(total_rows).max(1)
    }

    /// Runs `task` over the full row range of `out`, partitioned across
    /// the pool when the worker count allows.
    ///
    /// Rows are split into `worker_count` contiguous partitions of
    /// `total_rows / worker_count` rows each, the remainder folded into
    /// the last partition. Blocks until every partition completes. A
    /// panicking partition is logged and the partial write kept; the
    /// bands are disjoint, so the other partitions are unaffected.
    pub fn compute<T>(&self, pool: Option<&WorkerPool>, out: &mut Grid, task: &T)
    where
        T: Fn(&mut RowBand<'_>) + Sync,
    {
        let total_rows = out.rows();
        let workers = self.worker_count(pool, out.len(), total_rows);

        if workers <= 1 {
            task(&mut out.full_band_mut());
            return;
        }

        // workers > 1 implies a parallel-ready pool.
        let Some(pool) = pool else {
            task(&mut out.full_band_mut());
            return;
        };

        let rows_per_worker = total_rows / workers;
        let band_starts: Vec<usize> = (0..workers).map(|i| i * rows_per_worker).collect();
        let mut bands = out.split_rows_mut(&band_starts);

        pool.handle().scope(|scope| {
            for mut band in bands.drain(..) {
                scope.spawn(move |_| {
                    let rows = band.row_start()..band.row_end();
                    if catch_unwind(AssertUnwindSafe(|| task(&mut band))).is_err() {
                        warn!(?rows, "row partition worker failed; keeping partial result");
                    }
                });
            }
        });
    }
}

impl Default for WorkSplitter {
    fn default() -> Self {
        Self::new(true, DEF_MIN_CELLS_PER_THREAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use celllab_core::rules::LifeAutomaton;
    use celllab_core::Automaton;

    fn ready_pool() -> WorkerPool {
        WorkerPool::new(2, 5).unwrap()
    }

    #[test]
    fn test_serial_when_disabled() {
        let splitter = WorkSplitter::new(false, 100);
        let pool = ready_pool();
        assert_eq!(splitter.worker_count(Some(&pool), 100_000, 500), 1);
    }

    #[test]
    fn test_serial_without_pool() {
        let splitter = WorkSplitter::new(true, 100);
        assert_eq!(splitter.worker_count(None, 100_000, 500), 1);
    }

    #[test]
    fn test_serial_below_cell_budget() {
        let splitter = WorkSplitter::new(true, 10_000);
        let pool = ready_pool();
        assert_eq!(splitter.worker_count(Some(&pool), 10_000, 100), 1);
        assert_eq!(splitter.worker_count(Some(&pool), 10_001, 100), 1);
        assert_eq!(splitter.worker_count(Some(&pool), 20_001, 100), 2);
    }

    #[test]
    fn test_serial_on_trivial_pool() {
        let splitter = WorkSplitter::new(true, 100);
        let pool = WorkerPool::new(1, 2).unwrap();
        assert_eq!(splitter.worker_count(Some(&pool), 100_000, 500), 1);
    }

    #[test]
    fn test_worker_count_caps() {
        let splitter = WorkSplitter::new(true, 1_000);
        let pool = ready_pool();

        // Cell budget would allow 100 workers; max_threads - 1 caps at 4.
        assert_eq!(splitter.worker_count(Some(&pool), 100_000, 500), 4);
        // Never more workers than rows.
        assert_eq!(splitter.worker_count(Some(&pool), 100_000, 3), 3);
    }

    #[test]
    fn test_knob_change_reporting() {
        let splitter = WorkSplitter::default();
        assert!(splitter.is_parallel_enabled());
        assert!(splitter.set_parallel_enabled(false));
        assert!(!splitter.set_parallel_enabled(false));

        assert!(splitter.set_min_cells_per_thread(5_000));
        assert!(!splitter.set_min_cells_per_thread(5_000));
        assert_eq!(splitter.min_cells_per_thread(), 5_000);
    }

    #[test]
    fn test_remainder_rows_go_to_last_partition() {
        // 10 rows over 3 workers: partitions of 3, 3 and 4 rows.
        let splitter = WorkSplitter::new(true, 8);
        let pool = ready_pool();
        let mut out = Grid::new(&[10, 3]).unwrap();
        assert_eq!(splitter.worker_count(Some(&pool), out.len(), 10), 3);

        splitter.compute(Some(&pool), &mut out, &|band: &mut RowBand<'_>| {
            let width = (band.row_end() - band.row_start()) as f32;
            for row in band.row_start()..band.row_end() {
                for col in 0..3 {
                    band.set(row, col, width);
                }
            }
        });

        assert_eq!(out.get(&[0, 0]).unwrap(), 3.0);
        assert_eq!(out.get(&[5, 0]).unwrap(), 3.0);
        assert_eq!(out.get(&[6, 0]).unwrap(), 4.0);
        assert_eq!(out.get(&[9, 2]).unwrap(), 4.0);
    }

    #[test]
    fn test_parallel_matches_serial_output() {
        let automaton = LifeAutomaton::conway();
        let mut cur = Grid::new(&[200, 300]).unwrap();
        cur.fill_random_int(0, 2);

        let mut serial_out = cur.like();
        let serial = WorkSplitter::new(false, 1);
        serial.compute(None, &mut serial_out, &|band: &mut RowBand<'_>| {
            automaton.compute_rows(&cur, band, true);
        });

        let mut parallel_out = cur.like();
        let splitter = WorkSplitter::new(true, 1_000);
        let pool = ready_pool();
        assert!(splitter.worker_count(Some(&pool), cur.len(), cur.rows()) > 1);
        splitter.compute(Some(&pool), &mut parallel_out, &|band: &mut RowBand<'_>| {
            automaton.compute_rows(&cur, band, true);
        });

        assert_eq!(serial_out, parallel_out);
    }

    #[test]
    fn test_panicking_partition_keeps_others() {
        let splitter = WorkSplitter::new(true, 8);
        let pool = ready_pool();
        let mut out = Grid::new(&[12, 3]).unwrap();

        splitter.compute(Some(&pool), &mut out, &|band: &mut RowBand<'_>| {
            if band.row_start() == 0 {
                panic!("injected partition failure");
            }
            for row in band.row_start()..band.row_end() {
                for col in 0..3 {
                    band.set(row, col, 1.0);
                }
            }
        });

        // Rows of the failed partition keep their previous contents; the
        // other partitions landed in full.
        assert_eq!(out.get(&[11, 0]).unwrap(), 1.0);
        assert_eq!(out.get(&[0, 0]).unwrap(), 0.0);
    }
}
