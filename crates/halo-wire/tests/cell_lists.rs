//! Property tests: alive-cell lists survive the wire and the grid.
//!
//! A `TurnComplete` decoded off the wire, rebuilt into a [`Grid`], and
//! re-encoded from that grid's alive cells must reproduce the original
//! bytes exactly. Cells are emitted row-major, so the grid is the canonical
//! form of a list.

use std::io::Cursor;

use halo_core::{Event, Grid};
use halo_test_utils::random_grid;
use halo_wire::{decode_event, encode_event};
use proptest::prelude::*;

fn encode(event: &Event) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_event(&mut buf, event).unwrap();
    buf
}

proptest! {
    #[test]
    fn turn_complete_survives_decode_grid_encode(
        width in 1usize..48,
        height in 1usize..48,
        density in 0.0f64..1.0,
        seed in any::<u64>(),
        turn in any::<u64>(),
    ) {
        let grid = random_grid(width, height, density, seed);
        let original = encode(&Event::TurnComplete { turn, alive: grid.alive_cells() });

        let decoded = decode_event(&mut Cursor::new(&original)).unwrap();
        let Event::TurnComplete { turn: t, alive } = decoded else {
            panic!("decoded wrong event kind");
        };
        prop_assert_eq!(t, turn);

        let rebuilt = Grid::from_alive(width, height, alive).unwrap();
        prop_assert_eq!(&rebuilt, &grid);
        let reencoded = encode(&Event::TurnComplete { turn, alive: rebuilt.alive_cells() });
        prop_assert_eq!(reencoded, original);
    }
}
