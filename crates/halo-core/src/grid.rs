//! Toroidal boolean grid.
//!
//! [`Grid`] stores cells row-major in a single `Vec<bool>`. Dimensions are
//! fixed at construction; a generation step never mutates a grid in place,
//! it produces a new one from an immutable snapshot of the old.

use std::ops::Range;

use crate::cell::Cell;
use crate::error::GridError;
use crate::rule;

/// Pixel value for an alive cell in [`Grid::to_pixels`].
pub const ALIVE_PIXEL: u8 = 255;
/// Pixel value for a dead cell in [`Grid::to_pixels`].
pub const DEAD_PIXEL: u8 = 0;

/// Wrap a possibly out-of-range index onto `[0, len)`.
///
/// `len` must be non-zero. Handles any signed offset, not just `±1`.
#[inline]
pub fn wrap(val: isize, len: usize) -> usize {
    let n = len as isize;
    (((val % n) + n) % n) as usize
}

/// `width * height`, rejecting empty and unaddressable sizes.
fn cell_count(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::EmptyGrid { width, height });
    }
    width
        .checked_mul(height)
        .filter(|&n| isize::try_from(n).is_ok())
        .ok_or(GridError::TooLarge { width, height })
}

/// A `width x height` toroidal grid of alive/dead cells.
///
/// Neighbour queries wrap on both axes, so every cell has exactly eight
/// neighbours regardless of position.
///
/// # Examples
///
/// ```
/// use halo_core::{Cell, Grid};
///
/// // Horizontal blinker on a 5x5 torus.
/// let grid = Grid::from_alive(5, 5, [Cell::new(1, 2), Cell::new(2, 2), Cell::new(3, 2)]).unwrap();
/// assert_eq!(grid.alive_count(), 3);
/// assert_eq!(grid.live_neighbours(2, 1), 3);
///
/// let next = grid.step();
/// assert_eq!(next.alive_cells(), vec![Cell::new(2, 1), Cell::new(2, 2), Cell::new(2, 3)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an all-dead grid.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let len = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![false; len],
        })
    }

    /// Create a grid whose alive cells are exactly `alive`.
    ///
    /// Duplicate cells are harmless. Any cell outside the grid is an error.
    pub fn from_alive(
        width: usize,
        height: usize,
        alive: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(width, height)?;
        for cell in alive {
            if cell.x >= width || cell.y >= height {
                return Err(GridError::CellOutOfBounds {
                    cell,
                    width,
                    height,
                });
            }
            grid.cells[cell.y * width + cell.x] = true;
        }
        Ok(grid)
    }

    /// Wrap a row-major cell buffer of length `width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self, GridError> {
        let expected = cell_count(width, height)?;
        if cells.len() != expected {
            return Err(GridError::BufferLengthMismatch {
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// State of the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of bounds.
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) out of bounds");
        self.cells[y * self.width + x]
    }

    /// State of the cell at a signed position, wrapped onto the torus.
    pub fn get_wrapped(&self, x: isize, y: isize) -> bool {
        let x = wrap(x, self.width);
        let y = wrap(y, self.height);
        self.cells[y * self.width + x]
    }

    /// Row `y` as a slice of `width` cells.
    pub fn row(&self, y: usize) -> &[bool] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Rows `range` as one contiguous row-major slice.
    pub fn rows(&self, range: Range<usize>) -> &[bool] {
        &self.cells[range.start * self.width..range.end * self.width]
    }

    /// The full row-major cell buffer.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Count of the eight toroidal neighbours of `(x, y)` that are alive.
    pub fn live_neighbours(&self, x: usize, y: usize) -> u8 {
        let (x, y) = (x as isize, y as isize);
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) != (0, 0) && self.get_wrapped(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Single-threaded reference step over the whole torus.
    ///
    /// The banded scheduler in `halo-engine` must agree with this for
    /// every grid and worker count.
    pub fn step(&self) -> Grid {
        let mut cells = Vec::with_capacity(self.cells.len());
        for y in 0..self.height {
            for x in 0..self.width {
                cells.push(rule::next_state(self.get(x, y), self.live_neighbours(x, y)));
            }
        }
        Grid {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// All alive cells in row-major order.
    pub fn alive_cells(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &alive)| alive)
            .map(|(i, _)| Cell::new(i % self.width, i / self.width))
            .collect()
    }

    /// Number of alive cells.
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Cells whose state differs between `self` and `next`, row-major.
    ///
    /// # Panics
    ///
    /// Panics if the two grids have different dimensions.
    pub fn flips(&self, next: &Grid) -> Vec<Cell> {
        assert_eq!(
            (self.width, self.height),
            (next.width, next.height),
            "flips() requires equal dimensions"
        );
        self.cells
            .iter()
            .zip(&next.cells)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| Cell::new(i % self.width, i / self.width))
            .collect()
    }

    /// One byte per cell, row-major: [`ALIVE_PIXEL`] or [`DEAD_PIXEL`].
    pub fn to_pixels(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|&alive| if alive { ALIVE_PIXEL } else { DEAD_PIXEL })
            .collect()
    }
}
