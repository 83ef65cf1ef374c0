//! Simulation engine error types.

use thiserror::Error;

use celllab_core::GridError;

/// Simulation result type.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the simulation engine.
///
/// All variants are detected synchronously at the call boundary, before
/// any state mutation. Cancellation of a background task is not an error
/// and never surfaces here.
#[derive(Debug, Error)]
pub enum SimError {
    /// Grid construction or access failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Automaton dimensionality does not match the requested grid shape.
    #[error("Automaton expects {automaton} dimensions but shape has {shape}")]
    DimensionMismatch {
        /// Automaton dimensionality.
        automaton: usize,
        /// Supplied shape rank.
        shape: usize,
    },

    /// Frame rate must be positive.
    #[error("Frame rate must be positive, got {0}")]
    InvalidFrameRate(u32),

    /// Thread counts must satisfy `1 <= core <= max`.
    #[error("Thread counts must satisfy 1 <= core <= max, got core={core}, max={max}")]
    InvalidThreadCount {
        /// Requested core thread count.
        core: usize,
        /// Requested max thread count.
        max: usize,
    },

    /// Worker pool construction failed.
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(String),
}
