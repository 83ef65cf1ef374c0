//! Grid error types.

use thiserror::Error;

/// Grid result type.
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised by grid construction and access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Shape is empty or contains a non-positive dimension.
    #[error("Invalid shape: {0:?} (must be non-empty with positive dimensions)")]
    InvalidShape(Vec<usize>),

    /// Index vector length does not match the grid rank.
    #[error("Index rank mismatch: grid has {expected} dimensions, got {actual} indices")]
    RankMismatch {
        /// Grid rank.
        expected: usize,
        /// Supplied index count.
        actual: usize,
    },

    /// An index component is outside its dimension.
    #[error("Index {index} out of bounds for dimension {dim} of size {size}")]
    IndexOutOfBounds {
        /// Offending index component.
        index: usize,
        /// Dimension position.
        dim: usize,
        /// Dimension size.
        size: usize,
    },

    /// Reshape target does not preserve the cell count.
    #[error("Cannot reshape {from:?} into {to:?}: cell counts differ")]
    ShapeMismatch {
        /// Current shape.
        from: Vec<usize>,
        /// Requested shape.
        to: Vec<usize>,
    },
}
