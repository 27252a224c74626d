//! Well-known Life patterns placed at an offset on a torus.
//!
//! Every constructor takes the grid size and the top-left corner of the
//! pattern's bounding box; coordinates wrap, so a pattern may straddle an
//! edge.

use halo_core::{Cell, Grid};

fn place(width: usize, height: usize, x0: usize, y0: usize, offsets: &[(usize, usize)]) -> Grid {
    let cells = offsets
        .iter()
        .map(|&(dx, dy)| Cell::new((x0 + dx) % width, (y0 + dy) % height));
    Grid::from_alive(width, height, cells).expect("pattern: non-zero dimensions")
}

/// 2x2 still life.
pub fn block(width: usize, height: usize, x0: usize, y0: usize) -> Grid {
    place(width, height, x0, y0, &[(0, 0), (1, 0), (0, 1), (1, 1)])
}

/// Period-2 oscillator, horizontal phase: three cells in a row.
pub fn blinker_horizontal(width: usize, height: usize, x0: usize, y0: usize) -> Grid {
    place(width, height, x0, y0, &[(0, 0), (1, 0), (2, 0)])
}

/// Vertical phase of [`blinker_horizontal`] with the same centre, i.e.
/// `blinker_horizontal(.., x0, y0).step() == blinker_vertical(.., x0, y0)`.
pub fn blinker_vertical(width: usize, height: usize, x0: usize, y0: usize) -> Grid {
    let y_top = (y0 + height - 1) % height;
    place(width, height, x0 + 1, y_top, &[(0, 0), (0, 1), (0, 2)])
}

/// South-east travelling glider; repeats shifted by (+1, +1) every 4 turns.
///
/// ```text
/// . # .
/// . . #
/// # # #
/// ```
pub fn glider(width: usize, height: usize, x0: usize, y0: usize) -> Grid {
    place(
        width,
        height,
        x0,
        y0,
        &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_still() {
        let g = block(6, 6, 2, 2);
        assert_eq!(g.step(), g);
    }

    #[test]
    fn blinker_phases_alternate() {
        let h = blinker_horizontal(5, 5, 1, 2);
        let v = blinker_vertical(5, 5, 1, 2);
        assert_eq!(h.step(), v);
        assert_eq!(v.step(), h);
    }

    #[test]
    fn glider_translates_across_the_seam() {
        let mut g = glider(8, 8, 6, 6);
        for _ in 0..4 {
            g = g.step();
        }
        assert_eq!(g, glider(8, 8, 7, 7));
    }
}
