//! Error types for grid construction and session parameters.

use thiserror::Error;

use crate::cell::Cell;

/// Errors from constructing a [`Grid`](crate::Grid).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height is zero.
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// `width * height` does not fit in the address space.
    #[error("grid {width}x{height} is too large to allocate")]
    TooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// An alive cell lies outside the grid.
    #[error("cell {cell} is outside a {width}x{height} grid")]
    CellOutOfBounds {
        /// The offending cell.
        cell: Cell,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },
    /// A row-major cell buffer does not match `width * height`.
    #[error("cell buffer has {found} cells, expected {expected}")]
    BufferLengthMismatch {
        /// `width * height`.
        expected: usize,
        /// Length of the supplied buffer.
        found: usize,
    },
}

/// Errors detected by [`Params::validate()`](crate::Params::validate).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// Width or height is zero.
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension {
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },
    /// `width * height` exceeds the cell budget.
    #[error("grid {width}x{height} exceeds the limit of {max_cells} cells")]
    TooManyCells {
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
        /// Largest accepted cell count.
        max_cells: usize,
    },
    /// Worker count is zero.
    #[error("worker count must be at least 1")]
    ZeroWorkers,
    /// More workers than grid rows; some bands would be empty.
    #[error("worker count {workers} exceeds grid height {height}")]
    TooManyWorkers {
        /// Configured worker count.
        workers: usize,
        /// Grid height.
        height: usize,
    },
}
