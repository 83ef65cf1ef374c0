//! # celllab-sim
//!
//! Simulation engine for the celllab cellular automaton system.
//!
//! Layers scheduling and concurrency over `celllab-core`: a shared
//! [`WorkerPool`], the row-partitioning [`WorkSplitter`], a
//! snapshot-iterating [`Listeners`] registry, and the [`Simulator`]
//! play/pause engine with its two run modes (fixed-rate timer vs.
//! unthrottled loop).
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use celllab_core::rules::LifeAutomaton;
//! use celllab_sim::Simulator;
//!
//! let sim = Simulator::new(Arc::new(LifeAutomaton::conway()), &[64, 64], false).unwrap();
//! sim.set_cell_state(&[32, 31], 1.0).unwrap();
//! sim.set_cell_state(&[32, 32], 1.0).unwrap();
//! sim.set_cell_state(&[32, 33], 1.0).unwrap();
//!
//! sim.advance_generation(None);
//! assert_eq!(sim.generation(), 1);
//! assert_eq!(sim.cell_state(&[31, 32]).unwrap(), 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod error;
pub mod listeners;
pub mod pool;
pub mod simulator;
pub mod splitter;

pub use cancel::CancelToken;
pub use error::{SimError, SimResult};
pub use listeners::Listeners;
pub use pool::WorkerPool;
pub use simulator::{RunMode, Simulator, SimulatorListener};
pub use splitter::WorkSplitter;
