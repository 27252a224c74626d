//! Benchmark profiles for the Halo engine.
//!
//! - [`reference_profile`]: 512x512 soup at 25% density
//! - [`stress_profile`]: 2048x2048 soup at 25% density
//! - [`WORKER_COUNTS`]: band counts swept by the `advance` bench

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use halo_core::{Grid, Params};
use halo_test_utils::random_grid;

/// Band counts swept by the scheduler benchmarks.
pub const WORKER_COUNTS: [usize; 5] = [1, 2, 4, 8, 16];

/// A benchmark workload: parameters plus the starting grid.
pub struct Profile {
    /// Session parameters (turn limit is the number of turns to time).
    pub params: Params,
    /// Starting grid.
    pub grid: Grid,
}

fn soup(size: usize, workers: usize, turns: u64, seed: u64) -> Profile {
    Profile {
        params: Params {
            width: size,
            height: size,
            worker_count: workers,
            turn_limit: turns,
        },
        grid: random_grid(size, size, 0.25, seed),
    }
}

/// 512x512 (262K cells) random soup.
pub fn reference_profile(workers: usize, seed: u64) -> Profile {
    soup(512, workers, 10, seed)
}

/// 2048x2048 (4M cells) random soup.
pub fn stress_profile(workers: usize, seed: u64) -> Profile {
    soup(2048, workers, 2, seed)
}
