//! The automaton capability contract.
//!
//! An [`Automaton`] bundles the four behaviors the simulation engine needs
//! from a rule family: the row-range transition, cell edits, reset/clear
//! lifecycle fills, and the cell-state color mapping. Concrete rule sets
//! are independent implementors; there is no inheritance between them.

use crate::error::GridResult;
use crate::grid::{Grid, RowBand};

/// A pluggable cellular automaton rule set.
///
/// Implementations must be thread-safe: the engine invokes
/// [`compute_rows`](Automaton::compute_rows) from multiple worker threads
/// at once, each with a disjoint output band.
pub trait Automaton: Send + Sync {
    /// Human-readable rule name.
    fn name(&self) -> &str;

    /// Number of grid dimensions this automaton operates on.
    fn dimensions(&self) -> usize;

    /// Number of distinct cell states.
    fn state_count(&self) -> usize;

    /// Cell value of the state at `state_index`.
    fn state_value(&self, state_index: usize) -> f32;

    /// Cell value of the lowest state.
    fn lowest_state(&self) -> f32 {
        self.state_value(0)
    }

    /// Cell value of the highest state.
    fn highest_state(&self) -> f32 {
        self.state_value(self.state_count() - 1)
    }

    /// Whether the transition may be partitioned across worker threads.
    ///
    /// When false the engine always computes the full row range on one
    /// thread, regardless of the work splitter's configuration.
    fn is_parallel_eligible(&self) -> bool;

    /// Computes the next state of every cell in `out`'s row range.
    ///
    /// Must read only `cur` (never `out`) and must write every cell of the
    /// band. `cur` is the full current grid; `out` covers
    /// `[row_start, row_end)` of the same shape. This purity is what makes
    /// row partitioning safe without cross-worker synchronization.
    fn compute_rows(&self, cur: &Grid, out: &mut RowBand<'_>, wrap: bool);

    /// Writes a fresh starting pattern (typically random) into `out`,
    /// ignoring `cur` contents.
    fn reset_state(&self, cur: &Grid, out: &mut Grid, wrap: bool);

    /// Writes the empty pattern into `out`, ignoring `cur` contents.
    fn clear_state(&self, cur: &Grid, out: &mut Grid, wrap: bool);

    /// Advances one cell to its next state, wrapping past the highest.
    ///
    /// Returns whether the cell value actually changed.
    fn cycle_cell(&self, state: &mut Grid, indices: &[usize]) -> GridResult<bool>;

    /// Moves one cell a single state up or down, clamped to the state
    /// range. Returns whether the cell value actually changed.
    fn step_cell(&self, state: &mut Grid, indices: &[usize], step_up: bool) -> GridResult<bool>;

    /// Sets one cell to an exact value. Returns whether the cell value
    /// actually changed.
    fn set_cell(&self, state: &mut Grid, indices: &[usize], value: f32) -> GridResult<bool> {
        let prev = state.get(indices)?;
        state.set(value, indices)?;
        Ok(prev != value)
    }

    /// Display color for a cell state, packed `0xAARRGGBB`.
    fn cell_color(&self, cell_state: f32, dark_mode: bool) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::LifeAutomaton;

    #[test]
    fn test_default_state_bounds() {
        let automaton = LifeAutomaton::conway();
        assert_eq!(automaton.lowest_state(), 0.0);
        assert_eq!(automaton.highest_state(), 1.0);
    }

    #[test]
    fn test_default_set_cell_reports_change() {
        let automaton = LifeAutomaton::conway();
        let mut grid = Grid::new(&[3, 3]).unwrap();

        assert!(automaton.set_cell(&mut grid, &[1, 1], 1.0).unwrap());
        assert!(!automaton.set_cell(&mut grid, &[1, 1], 1.0).unwrap());
        assert!(automaton.set_cell(&mut grid, &[1, 1], 0.0).unwrap());
    }
}
