//! Horizontal grid bands with halo rows, and the per-band worker step.
//!
//! A [`Band`] owns a copy of rows `[lo, hi)` of a grid plus one halo row on
//! each side: row `lo - 1` above and row `hi` below, both wrapped onto the
//! torus. The halos are read-only context; only interior rows are computed.
//! A band is created fresh each turn, moved into exactly one worker, and
//! dropped once its [`BandOutput`] is produced.

use std::ops::Range;

use halo_core::grid::wrap;
use halo_core::{rule, Grid};

/// A contiguous row slice of a grid with one halo row above and below.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Band {
    lo: usize,
    width: usize,
    /// Interior row count (`hi - lo`).
    rows: usize,
    /// `rows + 2` rows, row-major: halo above, interior, halo below.
    cells: Vec<bool>,
}

/// The next-generation interior rows of a band.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandOutput {
    /// First grid row this output covers.
    pub lo: usize,
    /// `(hi - lo) * width` cells, row-major.
    pub cells: Vec<bool>,
}

impl Band {
    /// Copy rows `range` of `grid` plus their wrapped halo rows.
    ///
    /// With `range == 0..grid.height()` the halos are the grid's own last
    /// and first rows, which is the single-worker case.
    ///
    /// # Panics
    ///
    /// Panics if `range` is empty or extends past the grid.
    pub fn cut(grid: &Grid, range: Range<usize>) -> Self {
        let height = grid.height();
        assert!(
            range.start < range.end && range.end <= height,
            "band {range:?} invalid for grid height {height}"
        );
        let width = grid.width();
        let rows = range.end - range.start;
        let above = wrap(range.start as isize - 1, height);
        let below = range.end % height;

        let mut cells = Vec::with_capacity((rows + 2) * width);
        cells.extend_from_slice(grid.row(above));
        cells.extend_from_slice(grid.rows(range.clone()));
        cells.extend_from_slice(grid.row(below));

        Self {
            lo: range.start,
            width,
            rows,
            cells,
        }
    }

    /// First grid row of the interior.
    pub fn lo(&self) -> usize {
        self.lo
    }

    /// One past the last grid row of the interior.
    pub fn hi(&self) -> usize {
        self.lo + self.rows
    }

    /// Interior row count, halos excluded.
    pub fn height(&self) -> usize {
        self.rows
    }

    /// Row width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell at band-local row `r` (0 = halo above) and wrapped column `x`.
    #[inline]
    fn at(&self, x: isize, r: usize) -> bool {
        self.cells[r * self.width + wrap(x, self.width)]
    }

    fn live_neighbours(&self, x: usize, r: usize) -> u8 {
        let x = x as isize;
        let mut count = 0;
        for br in r - 1..=r + 1 {
            for dx in -1..=1 {
                if (br, dx) != (r, 0) && self.at(x + dx, br) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Compute the next generation of the interior rows.
    ///
    /// Pure function of the band: reads only the band and its halos.
    pub fn step(&self) -> BandOutput {
        let mut cells = Vec::with_capacity(self.rows * self.width);
        for r in 1..=self.rows {
            for x in 0..self.width {
                let alive = self.at(x as isize, r);
                cells.push(rule::next_state(alive, self.live_neighbours(x, r)));
            }
        }
        BandOutput { lo: self.lo, cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::Cell;

    #[test]
    fn halos_wrap_at_top_and_bottom() {
        // Mark each row's first cell only in rows 0 and 3.
        let grid = Grid::from_alive(2, 4, [Cell::new(0, 0), Cell::new(0, 3)]).unwrap();

        let top = Band::cut(&grid, 0..2);
        assert_eq!((top.lo(), top.hi(), top.height()), (0, 2, 2));
        // Halo above is row 3, halo below is row 2.
        assert_eq!(&top.cells[..2], &[true, false]);
        assert_eq!(&top.cells[6..], &[false, false]);

        let bottom = Band::cut(&grid, 2..4);
        // Halo above is row 1, halo below wraps to row 0.
        assert_eq!(&bottom.cells[..2], &[false, false]);
        assert_eq!(&bottom.cells[6..], &[true, false]);
    }

    #[test]
    fn whole_grid_band_self_wraps() {
        let grid = Grid::from_alive(3, 3, [Cell::new(1, 0), Cell::new(1, 2)]).unwrap();
        let band = Band::cut(&grid, 0..3);
        assert_eq!(band.height(), 3);
        assert_eq!(&band.cells[..3], grid.row(2));
        assert_eq!(&band.cells[12..], grid.row(0));
    }

    #[test]
    fn step_matches_reference_on_whole_grid() {
        let grid = Grid::from_alive(
            6,
            6,
            [Cell::new(1, 0), Cell::new(2, 1), Cell::new(0, 2), Cell::new(1, 2), Cell::new(2, 2)],
        )
        .unwrap();
        let out = Band::cut(&grid, 0..6).step();
        assert_eq!(out.lo, 0);
        assert_eq!(out.cells, grid.step().cells());
    }

    #[test]
    fn output_excludes_halo_rows() {
        let grid = Grid::new(5, 8).unwrap();
        let out = Band::cut(&grid, 3..6).step();
        assert_eq!(out.lo, 3);
        assert_eq!(out.cells.len(), 3 * 5);
    }

    #[test]
    fn interior_slice_matches_reference_rows() {
        // Glider crossing the band boundary at row 4.
        let grid = Grid::from_alive(
            8,
            8,
            [Cell::new(3, 3), Cell::new(4, 4), Cell::new(2, 5), Cell::new(3, 5), Cell::new(4, 5)],
        )
        .unwrap();
        let reference = grid.step();
        let out = Band::cut(&grid, 4..8).step();
        assert_eq!(out.cells, reference.rows(4..8));
    }
}
