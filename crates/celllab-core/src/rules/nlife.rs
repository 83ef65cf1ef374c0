//! N-state generalization of Conway's Game of Life.

use crate::automaton::Automaton;
use crate::color::{hue_cycle, invert_rgb, monochrome_ramp};
use crate::error::GridResult;
use crate::grid::{neighbor_indices_2d, Grid, RowBand};

use super::nstate;

/// N-state Life with threshold constants k1..k4.
///
/// Cells hold integer states in `[0, n]`. A cell above `n / 2` steps up
/// when its neighbor-state sum lies in `[k1, k2]` and down otherwise; a
/// cell at or below `n / 2` uses `[k3, k4]`. Taking `n = 1, k1 = 2,
/// k2 = k3 = k4 = 3` recovers Conway's rules.
#[derive(Debug, Clone)]
pub struct NLifeAutomaton {
    n: i64,
    k1: i64,
    k2: i64,
    k3: i64,
    k4: i64,
    colors: Vec<u32>,
}

impl NLifeAutomaton {
    /// Default state count parameter.
    pub const DEF_N: i64 = 4;
    /// Default thresholds.
    pub const DEF_K: (i64, i64, i64, i64) = (8, 12, 8, 9);

    /// Creates an automaton with explicit parameters.
    pub fn with_params(n: i64, k1: i64, k2: i64, k3: i64, k4: i64, monochrome: bool) -> Self {
        let n_states = n as usize;
        let colors = if monochrome {
            monochrome_ramp(n_states, 20.0, 0.4, 2.0)
        } else {
            hue_cycle(n_states, 0.0, 180.0)
        };

        Self {
            n,
            k1,
            k2,
            k3,
            k4,
            colors,
        }
    }

    /// Creates an automaton with `n` states above zero and default
    /// thresholds.
    pub fn with_n(n: i64) -> Self {
        let (k1, k2, k3, k4) = Self::DEF_K;
        Self::with_params(n, k1, k2, k3, k4, false)
    }
}

impl Default for NLifeAutomaton {
    fn default() -> Self {
        Self::with_n(Self::DEF_N)
    }
}

impl Automaton for NLifeAutomaton {
    fn name(&self) -> &str {
        "N-Life"
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn state_count(&self) -> usize {
        self.n as usize + 1
    }

    fn state_value(&self, state_index: usize) -> f32 {
        state_index as f32
    }

    fn is_parallel_eligible(&self) -> bool {
        true
    }

    fn compute_rows(&self, cur: &Grid, out: &mut RowBand<'_>, wrap: bool) {
        let rows = cur.shape_at(0);
        let cols = cur.shape_at(1);
        let half_max = self.n as f32 / 2.0;
        let mut neighbors = [[0usize; 2]; 8];

        for row in out.row_start()..out.row_end() {
            for col in 0..cols {
                let cell_state = nstate::to_int(cur.as_slice()[row * cols + col]);
                let count = neighbor_indices_2d(rows, cols, row, col, wrap, &mut neighbors);

                let mut neighbor_sum = 0i64;
                for &[r, c] in &neighbors[..count] {
                    neighbor_sum += nstate::to_int(cur.as_slice()[r * cols + c]);
                }

                let (low, high) = if cell_state as f32 > half_max {
                    (self.k1, self.k2)
                } else {
                    (self.k3, self.k4)
                };

                let next = if (low..=high).contains(&neighbor_sum) {
                    cell_state + 1
                } else {
                    cell_state - 1
                };

                out.set(row, col, nstate::constrain(next, 0, self.n) as f32);
            }
        }
    }

    fn reset_state(&self, _cur: &Grid, out: &mut Grid, _wrap: bool) {
        nstate::reset_fill(out, self.n);
    }

    fn clear_state(&self, _cur: &Grid, out: &mut Grid, _wrap: bool) {
        out.clear();
    }

    fn cycle_cell(&self, state: &mut Grid, indices: &[usize]) -> GridResult<bool> {
        nstate::cycle_cell(state, indices, self.n)
    }

    fn step_cell(&self, state: &mut Grid, indices: &[usize], step_up: bool) -> GridResult<bool> {
        nstate::step_cell(state, indices, self.n, step_up)
    }

    fn cell_color(&self, cell_state: f32, dark_mode: bool) -> u32 {
        let color = self.colors[nstate::constrain(nstate::to_int(cell_state), 0, self.n) as usize];
        if dark_mode {
            invert_rgb(color)
        } else {
            color
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_range() {
        let automaton = NLifeAutomaton::default();
        assert_eq!(automaton.state_count(), 5);
        assert_eq!(automaton.lowest_state(), 0.0);
        assert_eq!(automaton.highest_state(), 4.0);
    }

    #[test]
    fn test_transition_steps_by_one() {
        let automaton = NLifeAutomaton::default();
        let mut grid = Grid::new(&[4, 4]).unwrap();
        grid.fill(2.0);

        let mut out = grid.like();
        automaton.compute_rows(&grid, &mut out.full_band_mut(), true);

        // Every interior sum is 8 * 2 = 16, outside [k3, k4] = [8, 9],
        // so each cell decays by one.
        assert!(out.as_slice().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_transition_clamps_to_range() {
        let automaton = NLifeAutomaton::default();
        let mut grid = Grid::new(&[3, 3]).unwrap();
        grid.fill(0.0);

        let mut out = grid.like();
        automaton.compute_rows(&grid, &mut out.full_band_mut(), true);
        assert!(out.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_growth_inside_thresholds() {
        let automaton = NLifeAutomaton::default();
        let mut grid = Grid::new(&[3, 3]).unwrap();
        grid.fill(1.0);

        let mut out = grid.like();
        automaton.compute_rows(&grid, &mut out.full_band_mut(), true);

        // With wrap, every neighbor sum is 8, inside [k3, k4] = [8, 9].
        assert!(out.as_slice().iter().all(|&v| v == 2.0));
    }
}
