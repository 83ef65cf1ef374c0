//! Epidemic-style automaton modelling the Belousov-Zhabotinsky reaction.

use crate::automaton::Automaton;
use crate::color::{hue_cycle, invert_rgb, monochrome_ramp};
use crate::error::GridResult;
use crate::grid::{neighbor_indices_2d, Grid, RowBand};

use super::nstate;

/// Belousov-Zhabotinsky reaction automaton.
///
/// Cells hold integer states in `[0, n]`: healthy (0), infected
/// (`1..n`), ill (`n`). Per step:
///
/// - an ill cell recovers to healthy;
/// - a healthy cell becomes `infected / k1 + ill / k2` (neighbor counts);
/// - an infected cell becomes `sum / (infected + ill + 1) + g`, where
///   `sum` is the state sum over the cell and its neighbors.
///
/// All results clamp to `[0, n]`.
#[derive(Debug, Clone)]
pub struct ZhabotinskyAutomaton {
    n: i64,
    k1: f32,
    k2: f32,
    g: i64,
    colors: Vec<u32>,
}

impl ZhabotinskyAutomaton {
    /// Default state count parameter.
    pub const DEF_N: i64 = 99;
    /// Default infection constants (k1, k2).
    pub const DEF_K: (f32, f32) = (2.0, 3.0);
    /// Default infection spread rate.
    pub const DEF_G: i64 = 35;

    /// Creates an automaton with explicit parameters.
    pub fn with_params(n: i64, k1: f32, k2: f32, g: i64, monochrome: bool) -> Self {
        let n_states = n as usize;
        let colors = if monochrome {
            monochrome_ramp(n_states, 20.0, 0.4, 7.0)
        } else {
            hue_cycle(n_states, 18.0, 162.0)
        };

        Self {
            n,
            k1,
            k2,
            g,
            colors,
        }
    }

    /// Creates an automaton with `n` states above zero and default
    /// constants.
    pub fn with_n(n: i64) -> Self {
        let (k1, k2) = Self::DEF_K;
        Self::with_params(n, k1, k2, Self::DEF_G, true)
    }
}

impl Default for ZhabotinskyAutomaton {
    fn default() -> Self {
        Self::with_n(Self::DEF_N)
    }
}

impl Automaton for ZhabotinskyAutomaton {
    fn name(&self) -> &str {
        "Zhabotinsky"
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
        let mut neighbors = [[0usize; 2]; 8];

        for row in out.row_start()..out.row_end() {
            for col in 0..cols {
                let cell_state = nstate::to_int(cur.as_slice()[row * cols + col]);

                let next = if cell_state == self.n {
                    // Ill cells recover.
                    0
                } else {
                    let count = neighbor_indices_2d(rows, cols, row, col, wrap, &mut neighbors);

                    let mut state_sum = cell_state;
                    let mut infected = 0i64;
                    let mut ill = 0i64;
                    for &[r, c] in &neighbors[..count] {
                        let neighbor_state = nstate::to_int(cur.as_slice()[r * cols + c]);
                        state_sum += neighbor_state;
                        if neighbor_state == self.n {
                            ill += 1;
                        } else if neighbor_state > 0 {
                            infected += 1;
                        }
                    }

                    let raw = if cell_state == 0 {
                        (infected as f32 / self.k1) as i64 + (ill as f32 / self.k2) as i64
                    } else {
                        state_sum / (infected + ill + 1) + self.g
                    };

                    nstate::constrain(raw, 0, self.n)
                };

                out.set(row, col, next as f32);
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

    fn step(automaton: &ZhabotinskyAutomaton, grid: &Grid) -> Grid {
        let mut out = grid.like();
        automaton.compute_rows(grid, &mut out.full_band_mut(), true);
        out
    }

    #[test]
    fn test_ill_cells_recover() {
        let automaton = ZhabotinskyAutomaton::with_n(9);
        let mut grid = Grid::new(&[3, 3]).unwrap();
        grid.fill(9.0);

        let next = step(&automaton, &grid);
        assert!(next.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_healthy_stays_healthy_without_infection() {
        let automaton = ZhabotinskyAutomaton::default();
        let grid = Grid::new(&[4, 4]).unwrap();

        let next = step(&automaton, &grid);
        assert!(next.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_healthy_catches_infection_from_neighbors() {
        let automaton = ZhabotinskyAutomaton::with_params(9, 2.0, 3.0, 3, true);
        let mut grid = Grid::new(&[5, 5]).unwrap();
        // Four infected neighbors around (2, 2).
        for &(r, c) in &[(1, 2), (3, 2), (2, 1), (2, 3)] {
            grid.set(4.0, &[r, c]).unwrap();
        }

        let next = step(&automaton, &grid);
        // infected / k1 = 4 / 2 = 2, no ill neighbors.
        assert_eq!(next.get(&[2, 2]).unwrap(), 2.0);
    }

    #[test]
    fn test_infected_cell_advances() {
        let automaton = ZhabotinskyAutomaton::with_params(99, 2.0, 3.0, 35, true);
        let mut grid = Grid::new(&[3, 3]).unwrap();
        grid.set(10.0, &[1, 1]).unwrap();

        let next = step(&automaton, &grid);
        // sum = 10 over one infected cell (itself has no infected
        // neighbors): 10 / 1 + g = 45.
        assert_eq!(next.get(&[1, 1]).unwrap(), 45.0);
    }

    #[test]
    fn test_states_stay_in_range() {
        let automaton = ZhabotinskyAutomaton::with_n(9);
        let mut grid = Grid::new(&[16, 16]).unwrap();
        grid.fill_random_int(0, 10);

        let mut state = grid;
        for _ in 0..10 {
            state = step(&automaton, &state);
            assert!(state.as_slice().iter().all(|&v| (0.0..=9.0).contains(&v)));
        }
    }
}
