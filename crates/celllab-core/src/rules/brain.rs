//! Brian's Brain: a three-state firing/refractory/dead automaton.

use crate::automaton::Automaton;
use crate::color::{gray, hue_cycle, invert_rgb};
use crate::error::GridResult;
use crate::grid::{neighbor_indices_2d, Grid, RowBand};

use super::nstate;

const N: i64 = 2;
const FIRING: i64 = 2;

/// Brian's Brain.
///
/// States: dead (0), refractory (1), firing (2). A dead cell fires when
/// exactly two neighbors are firing; a firing cell always becomes
/// refractory and a refractory cell always dies.
#[derive(Debug, Clone)]
pub struct BrianBrainAutomaton {
    colors: Vec<u32>,
}

impl BrianBrainAutomaton {
    /// Creates the automaton; `monochrome` selects a grayscale map over
    /// the hue-cycle map.
    pub fn new(monochrome: bool) -> Self {
        let colors = if monochrome {
            (0..=N as usize)
                .map(|i| gray((255 - i * 255 / N as usize) as u8))
                .collect()
        } else {
            hue_cycle(N as usize, 0.0, 180.0)
        };
        Self { colors }
    }
}

impl Default for BrianBrainAutomaton {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Automaton for BrianBrainAutomaton {
    fn name(&self) -> &str {
        "Brian's Brain"
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn state_count(&self) -> usize {
        N as usize + 1
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

                let next = if cell_state == 0 {
                    let count = neighbor_indices_2d(rows, cols, row, col, wrap, &mut neighbors);
                    let mut firing = 0;
                    for &[r, c] in &neighbors[..count] {
                        if nstate::to_int(cur.as_slice()[r * cols + c]) == FIRING {
                            firing += 1;
                        }
                    }
                    if firing == 2 {
                        FIRING
                    } else {
                        0
                    }
                } else {
                    cell_state - 1
                };

                out.set(row, col, next as f32);
            }
        }
    }

    fn reset_state(&self, _cur: &Grid, out: &mut Grid, _wrap: bool) {
        nstate::reset_fill(out, N);
    }

    fn clear_state(&self, _cur: &Grid, out: &mut Grid, _wrap: bool) {
        out.clear();
    }

    fn cycle_cell(&self, state: &mut Grid, indices: &[usize]) -> GridResult<bool> {
        nstate::cycle_cell(state, indices, N)
    }

    fn step_cell(&self, state: &mut Grid, indices: &[usize], step_up: bool) -> GridResult<bool> {
        nstate::step_cell(state, indices, N, step_up)
    }

    fn cell_color(&self, cell_state: f32, dark_mode: bool) -> u32 {
        let color = self.colors[nstate::constrain(nstate::to_int(cell_state), 0, N) as usize];
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

    fn step(automaton: &BrianBrainAutomaton, grid: &Grid, wrap: bool) -> Grid {
        let mut out = grid.like();
        automaton.compute_rows(grid, &mut out.full_band_mut(), wrap);
        out
    }

    #[test]
    fn test_firing_decays_through_refractory() {
        let automaton = BrianBrainAutomaton::default();
        let mut grid = Grid::new(&[5, 5]).unwrap();
        grid.set(2.0, &[2, 2]).unwrap();

        let next = step(&automaton, &grid, false);
        assert_eq!(next.get(&[2, 2]).unwrap(), 1.0);

        let next = step(&automaton, &next, false);
        assert_eq!(next.get(&[2, 2]).unwrap(), 0.0);
    }

    #[test]
    fn test_dead_cell_fires_on_exactly_two() {
        let automaton = BrianBrainAutomaton::default();
        let mut grid = Grid::new(&[5, 5]).unwrap();
        grid.set(2.0, &[2, 1]).unwrap();
        grid.set(2.0, &[2, 3]).unwrap();

        let next = step(&automaton, &grid, false);
        // (2, 2) sees two firing neighbors; (1, 1) sees only one.
        assert_eq!(next.get(&[2, 2]).unwrap(), 2.0);
        assert_eq!(next.get(&[1, 1]).unwrap(), 0.0);
    }

    #[test]
    fn test_refractory_neighbors_do_not_trigger() {
        let automaton = BrianBrainAutomaton::default();
        let mut grid = Grid::new(&[5, 5]).unwrap();
        grid.set(1.0, &[2, 1]).unwrap();
        grid.set(1.0, &[2, 3]).unwrap();

        let next = step(&automaton, &grid, false);
        assert_eq!(next.get(&[2, 2]).unwrap(), 0.0);
    }
}
