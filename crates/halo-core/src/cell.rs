//! Sparse cell coordinates.

use std::fmt;

/// A grid position: `x` is the column, `y` is the row.
///
/// Cells are the sparse representation used on the wire (a flattened
/// `x y x y ...` list of alive cells) and the unit of flip reporting.
///
/// # Examples
///
/// ```
/// use halo_core::Cell;
///
/// let c = Cell::new(3, 7);
/// assert_eq!((c.x, c.y), (3, 7));
/// assert_eq!(c.to_string(), "(3, 7)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Column index.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl Cell {
    /// Create a cell at column `x`, row `y`.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}
