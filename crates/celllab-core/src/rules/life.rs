//! Two-state Life-family automata.
//!
//! Cells are dead (0) or alive (1) with an 8-connected neighborhood.
//! Rules are written in B[x]/S[y] notation: a dead cell is born with x
//! alive neighbors, an alive cell survives with y alive neighbors.

use crate::automaton::Automaton;
use crate::color::invert_rgb;
use crate::error::GridResult;
use crate::grid::{neighbor_indices_2d, Grid, RowBand};

const LIGHT_OFF: u32 = 0xFFFF_FFFF;
const LIGHT_ON: u32 = 0xFF00_0000;

/// A B/S rule of the two-state Life family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifeRule {
    /// B3/S23 — Conway's Game of Life.
    ConwayLife,
    /// B34/S34.
    Life34,
    /// B36/S23.
    HighLife,
    /// B2/S — explosive growth, nothing survives.
    Seeds,
    /// B1357/S1357 — patterns replicate.
    Replicator,
    /// B3/S012345678 — alive cells never die.
    Flakes,
    /// B35678/S5678 — amoeba-like growth.
    Diamoeba,
    /// B36/S125.
    Life2x2,
    /// B368/S245.
    Morley,
    /// B4678/S35678.
    Anneal,
    /// B3678/S34678 — symmetric under state inversion.
    DayNight,
}

impl LifeRule {
    /// Every rule in the family.
    pub const ALL: [LifeRule; 11] = [
        LifeRule::ConwayLife,
        LifeRule::Life34,
        LifeRule::HighLife,
        LifeRule::Seeds,
        LifeRule::Replicator,
        LifeRule::Flakes,
        LifeRule::Diamoeba,
        LifeRule::Life2x2,
        LifeRule::Morley,
        LifeRule::Anneal,
        LifeRule::DayNight,
    ];

    /// Display name of the rule.
    pub fn display_name(self) -> &'static str {
        match self {
            LifeRule::ConwayLife => "Conway Life",
            LifeRule::Life34 => "Life-34",
            LifeRule::HighLife => "Life-High",
            LifeRule::Seeds => "Life-Seeds",
            LifeRule::Replicator => "Life-Replicator",
            LifeRule::Flakes => "Life-Flakes",
            LifeRule::Diamoeba => "Life-Diamoeba",
            LifeRule::Life2x2 => "Life-2x2",
            LifeRule::Morley => "Life-Morley",
            LifeRule::Anneal => "Life-Anneal",
            LifeRule::DayNight => "Life-DayNight",
        }
    }

    /// Next state of a cell with the given alive-neighbor count.
    fn next_state(self, alive: bool, alive_neighbors: usize) -> bool {
        let n = alive_neighbors;
        match self {
            LifeRule::ConwayLife => n == 3 || (alive && n == 2),
            LifeRule::Life34 => n == 3 || n == 4,
            LifeRule::HighLife => {
                if alive {
                    n == 2 || n == 3
                } else {
                    n == 3 || n == 6
                }
            }
            LifeRule::Seeds => !alive && n == 2,
            LifeRule::Replicator => n % 2 == 1,
            LifeRule::Flakes => alive || n == 3,
            LifeRule::Diamoeba => n >= 5 || (!alive && n == 3),
            LifeRule::Life2x2 => {
                if alive {
                    n == 1 || n == 2 || n == 5
                } else {
                    n == 3 || n == 6
                }
            }
            LifeRule::Morley => {
                if alive {
                    n == 2 || n == 4 || n == 5
                } else {
                    n == 3 || n == 6 || n == 8
                }
            }
            LifeRule::Anneal => {
                if alive {
                    n == 3 || n >= 5
                } else {
                    n == 4 || n >= 6
                }
            }
            LifeRule::DayNight => n == 3 || n >= 6 || (alive && n == 4),
        }
    }

    /// (light-off, light-on, dark-off, dark-on) cell colors.
    fn colors(self) -> (u32, u32, u32, u32) {
        match self {
            LifeRule::Flakes => (LIGHT_OFF, 0xFF25_A7DF, LIGHT_ON, 0xFF22_DFFF),
            _ => (LIGHT_OFF, LIGHT_ON, invert_rgb(LIGHT_OFF), invert_rgb(LIGHT_ON)),
        }
    }
}

#[inline]
fn is_alive(state: f32) -> bool {
    state as i64 == 1
}

#[inline]
fn to_state(alive: bool) -> f32 {
    if alive {
        1.0
    } else {
        0.0
    }
}

/// Two-state automaton driven by a [`LifeRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeAutomaton {
    rule: LifeRule,
}

impl LifeAutomaton {
    /// Creates an automaton for the given rule.
    pub fn new(rule: LifeRule) -> Self {
        Self { rule }
    }

    /// Conway's Game of Life (B3/S23).
    pub fn conway() -> Self {
        Self::new(LifeRule::ConwayLife)
    }

    /// The rule this automaton applies.
    pub fn rule(&self) -> LifeRule {
        self.rule
    }
}

impl Automaton for LifeAutomaton {
    fn name(&self) -> &str {
        self.rule.display_name()
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn state_count(&self) -> usize {
        2
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
                let alive = is_alive(cur.as_slice()[row * cols + col]);
                let count = neighbor_indices_2d(rows, cols, row, col, wrap, &mut neighbors);

                let mut alive_neighbors = 0;
                for &[r, c] in &neighbors[..count] {
                    alive_neighbors += cur.as_slice()[r * cols + c] as usize;
                }

                out.set(row, col, to_state(self.rule.next_state(alive, alive_neighbors)));
            }
        }
    }

    fn reset_state(&self, _cur: &Grid, out: &mut Grid, _wrap: bool) {
        out.fill_random_int(0, 2);
    }

    fn clear_state(&self, _cur: &Grid, out: &mut Grid, _wrap: bool) {
        out.clear();
    }

    fn cycle_cell(&self, state: &mut Grid, indices: &[usize]) -> GridResult<bool> {
        let alive = is_alive(state.get(indices)?);
        state.set(to_state(!alive), indices)?;
        Ok(true)
    }

    fn step_cell(&self, state: &mut Grid, indices: &[usize], step_up: bool) -> GridResult<bool> {
        let alive = is_alive(state.get(indices)?);
        state.set(to_state(step_up), indices)?;
        Ok(alive != step_up)
    }

    fn cell_color(&self, cell_state: f32, dark_mode: bool) -> u32 {
        let (light_off, light_on, dark_off, dark_on) = self.rule.colors();
        match (is_alive(cell_state), dark_mode) {
            (false, false) => light_off,
            (true, false) => light_on,
            (false, true) => dark_off,
            (true, true) => dark_on,
        }
    }
}
