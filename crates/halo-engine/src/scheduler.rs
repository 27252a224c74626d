//! Band partitioning and the per-turn worker fan-out.
//!
//! [`ChunkScheduler::advance`] cuts the grid into bands, moves each band into
//! its own scoped thread, joins every worker, and concatenates the outputs in
//! row order. Nothing outside the call ever sees a partially computed grid.

use std::ops::Range;
use std::thread;

use halo_core::Grid;

use crate::band::{Band, BandOutput};
use crate::config::ConfigError;

/// Split `height` rows into `workers` contiguous bands.
///
/// Each band gets `height / workers` rows; the first `height % workers`
/// bands get one extra row so that every row is covered exactly once. The
/// band count is clamped to `height`, so no band is ever empty.
///
/// # Examples
///
/// ```
/// use halo_engine::partition;
///
/// assert_eq!(partition(16, 4), vec![0..4, 4..8, 8..12, 12..16]);
/// assert_eq!(partition(10, 3), vec![0..4, 4..7, 7..10]);
/// assert_eq!(partition(2, 5), vec![0..1, 1..2]);
/// ```
pub fn partition(height: usize, workers: usize) -> Vec<Range<usize>> {
    let bands = workers.clamp(1, height.max(1));
    let base = height / bands;
    let extra = height % bands;
    let mut ranges = Vec::with_capacity(bands);
    let mut lo = 0;
    for i in 0..bands {
        let len = base + usize::from(i < extra);
        ranges.push(lo..lo + len);
        lo += len;
    }
    ranges
}

/// Advances a grid one generation using a fixed number of band workers.
#[derive(Clone, Debug)]
pub struct ChunkScheduler {
    worker_count: usize,
}

impl ChunkScheduler {
    /// Create a scheduler that fans out to `worker_count` bands per turn.
    pub fn new(worker_count: usize) -> Result<Self, ConfigError> {
        if worker_count == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(Self { worker_count })
    }

    /// Compute the next generation of `grid`.
    ///
    /// Blocks until every band worker has returned. A panicking worker is
    /// re-raised on the calling thread; no partial grid is produced.
    pub fn advance(&self, grid: &Grid) -> Grid {
        let ranges = partition(grid.height(), self.worker_count);

        let outputs: Vec<BandOutput> = if ranges.len() == 1 {
            vec![Band::cut(grid, 0..grid.height()).step()]
        } else {
            let bands: Vec<Band> = ranges.into_iter().map(|r| Band::cut(grid, r)).collect();
            thread::scope(|scope| {
                let handles: Vec<_> = bands
                    .into_iter()
                    .map(|band| scope.spawn(move || band.step()))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                    .collect()
            })
        };

        let mut cells = Vec::with_capacity(grid.width() * grid.height());
        for out in outputs {
            debug_assert_eq!(out.lo * grid.width(), cells.len(), "bands out of order");
            cells.extend(out.cells);
        }
        Grid::from_cells(grid.width(), grid.height(), cells)
            .unwrap_or_else(|e| unreachable!("reassembled grid has input dimensions: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::Cell;
    use proptest::prelude::*;

    #[test]
    fn partition_even_split() {
        assert_eq!(partition(8, 2), vec![0..4, 4..8]);
        assert_eq!(partition(8, 1), vec![0..8]);
    }

    #[test]
    fn partition_spreads_remainder_to_first_bands() {
        assert_eq!(partition(11, 4), vec![0..3, 3..6, 6..9, 9..11]);
    }

    #[test]
    fn partition_clamps_band_count() {
        assert_eq!(partition(3, 8), vec![0..1, 1..2, 2..3]);
        assert_eq!(partition(4, 0), vec![0..4]);
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(matches!(ChunkScheduler::new(0), Err(ConfigError::ZeroWorkers)));
    }

    #[test]
    fn empty_grid_stays_empty() {
        let grid = Grid::new(9, 7).unwrap();
        for workers in [1, 3, 7] {
            let sched = ChunkScheduler::new(workers).unwrap();
            assert_eq!(sched.advance(&grid).alive_count(), 0, "workers={workers}");
        }
    }

    #[test]
    fn block_is_still_life() {
        let grid = Grid::from_alive(
            6,
            6,
            [Cell::new(2, 2), Cell::new(3, 2), Cell::new(2, 3), Cell::new(3, 3)],
        )
        .unwrap();
        for workers in [1, 2, 3, 6] {
            let sched = ChunkScheduler::new(workers).unwrap();
            assert_eq!(sched.advance(&grid), grid, "workers={workers}");
        }
    }

    #[test]
    fn block_straddling_band_and_torus_edges() {
        // Block split across the wrap seam: rows 5 and 0, columns 5 and 0.
        let grid = Grid::from_alive(
            6,
            6,
            [Cell::new(5, 5), Cell::new(0, 5), Cell::new(5, 0), Cell::new(0, 0)],
        )
        .unwrap();
        let sched = ChunkScheduler::new(3).unwrap();
        assert_eq!(sched.advance(&grid), grid);
    }

    proptest! {
        #[test]
        fn partition_covers_every_row_once(height in 1usize..200, workers in 1usize..32) {
            let ranges = partition(height, workers);
            prop_assert_eq!(ranges.len(), workers.min(height));
            prop_assert_eq!(ranges[0].start, 0);
            prop_assert_eq!(ranges.last().map(|r| r.end), Some(height));
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            let (min, max) = ranges.iter().map(|r| r.len()).fold((usize::MAX, 0), |(lo, hi), n| (lo.min(n), hi.max(n)));
            prop_assert!(min >= 1);
            prop_assert!(max - min <= 1);
        }

        #[test]
        fn banded_advance_matches_reference(
            width in 1usize..20,
            height in 1usize..20,
            workers in 1usize..8,
            bits in proptest::collection::vec(any::<bool>(), 400),
        ) {
            let grid = Grid::from_cells(width, height, bits[..width * height].to_vec()).unwrap();
            let sched = ChunkScheduler::new(workers).unwrap();
            prop_assert_eq!(sched.advance(&grid), grid.step());
        }
    }
}
