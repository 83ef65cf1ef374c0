//! Shared behavior for N-state rule families.
//!
//! N-state automata hold integer cell states in `[0, n]`, n >= 1 (n + 1
//! states total). The edit, reset and clear semantics below are common to
//! every such family; each implementor composes these helpers rather than
//! inheriting from a base rule.

use crate::error::GridResult;
use crate::grid::Grid;

/// Truncates a cell value to its integer state.
#[inline]
pub(crate) fn to_int(value: f32) -> i64 {
    value as i64
}

/// Clamps `value` into `[low, high]`.
#[inline]
pub(crate) fn constrain(value: i64, low: i64, high: i64) -> i64 {
    value.clamp(low, high)
}

/// Advances a cell to the next state, wrapping `n` back to 0.
pub(crate) fn cycle_cell(state: &mut Grid, indices: &[usize], n: i64) -> GridResult<bool> {
    let prev = state.get(indices)?;
    let mut next = to_int(prev) + 1;
    if next > n {
        next = 0;
    }

    if prev != next as f32 {
        state.set(next as f32, indices)?;
        return Ok(true);
    }
    Ok(false)
}

/// Moves a cell one state up or down, clamped to `[0, n]`.
pub(crate) fn step_cell(state: &mut Grid, indices: &[usize], n: i64, step_up: bool) -> GridResult<bool> {
    let prev = state.get(indices)?;
    let next = constrain(to_int(prev) + if step_up { 1 } else { -1 }, 0, n);

    if prev != next as f32 {
        state.set(next as f32, indices)?;
        return Ok(true);
    }
    Ok(false)
}

/// Random integer refill over the full state range `[0, n]`.
pub(crate) fn reset_fill(out: &mut Grid, n: i64) {
    out.fill_random_int(0, n as i32 + 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_to_zero() {
        let mut grid = Grid::new(&[2, 2]).unwrap();
        grid.set(2.0, &[0, 0]).unwrap();

        assert!(cycle_cell(&mut grid, &[0, 0], 2).unwrap());
        assert_eq!(grid.get(&[0, 0]).unwrap(), 0.0);

        assert!(cycle_cell(&mut grid, &[0, 0], 2).unwrap());
        assert_eq!(grid.get(&[0, 0]).unwrap(), 1.0);
    }

    #[test]
    fn test_step_clamps_at_bounds() {
        let mut grid = Grid::new(&[2, 2]).unwrap();

        // Already at the lowest state: stepping down is a no-op.
        assert!(!step_cell(&mut grid, &[0, 0], 4, false).unwrap());
        assert_eq!(grid.get(&[0, 0]).unwrap(), 0.0);

        assert!(step_cell(&mut grid, &[0, 0], 4, true).unwrap());
        assert_eq!(grid.get(&[0, 0]).unwrap(), 1.0);

        grid.set(4.0, &[0, 0]).unwrap();
        assert!(!step_cell(&mut grid, &[0, 0], 4, true).unwrap());
        assert_eq!(grid.get(&[0, 0]).unwrap(), 4.0);
    }

    #[test]
    fn test_reset_fill_range() {
        let mut grid = Grid::new(&[30, 30]).unwrap();
        reset_fill(&mut grid, 2);
        assert!(grid.as_slice().iter().all(|&v| (0.0..=2.0).contains(&v)));
    }
}
