//! Test patterns and seeded grid fixtures for Halo development.
//!
//! - [`patterns`]: still lifes, oscillators, and spaceships placed on a
//!   caller-sized torus.
//! - [`random_grid`]: deterministic pseudo-random soup from a seed.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod patterns;

use halo_core::Grid;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A `width x height` grid where each cell is alive with probability
/// `density` (clamped to `[0, 1]`), drawn from a ChaCha8 stream seeded
/// with `seed`.
///
/// Panics if either dimension is zero.
pub fn random_grid(width: usize, height: usize, density: f64, seed: u64) -> Grid {
    let threshold = (density.clamp(0.0, 1.0) * u32::MAX as f64) as u32;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cells = (0..width * height)
        .map(|_| density > 0.0 && rng.next_u32() <= threshold)
        .collect();
    Grid::from_cells(width, height, cells).expect("random_grid: non-zero dimensions")
}

/// Run `grid` forward `turns` generations with the single-threaded
/// reference step.
pub fn reference_after(grid: &Grid, turns: u64) -> Grid {
    let mut g = grid.clone();
    for _ in 0..turns {
        g = g.step();
    }
    g
}
