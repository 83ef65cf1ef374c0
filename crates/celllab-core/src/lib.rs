//! # celllab-core
//!
//! Core types for the celllab cellular automaton engine.
//!
//! This crate is the pure-compute half of the system: dense N-dimensional
//! cell grids, the [`Automaton`] capability contract, and the built-in
//! rule families. It knows nothing about threads or scheduling; the
//! `celllab-sim` crate layers the worker pool, work splitter and the
//! play/pause simulation engine on top.
//!
//! ## Example
//!
//! ```
//! use celllab_core::rules::LifeAutomaton;
//! use celllab_core::{Automaton, Grid};
//!
//! let automaton = LifeAutomaton::conway();
//! let mut cur = Grid::new(&[5, 5]).unwrap();
//! cur.set(1.0, &[2, 1]).unwrap();
//! cur.set(1.0, &[2, 2]).unwrap();
//! cur.set(1.0, &[2, 3]).unwrap();
//!
//! let mut next = cur.like();
//! automaton.compute_rows(&cur, &mut next.full_band_mut(), false);
//! assert_eq!(next.get(&[1, 2]).unwrap(), 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod automaton;
pub mod color;
pub mod error;
pub mod grid;
pub mod rules;

pub use automaton::Automaton;
pub use error::{GridError, GridResult};
pub use grid::{neighbor_indices_2d, Grid, RowBand};
