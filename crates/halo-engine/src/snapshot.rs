//! Latest-generation publication for out-of-band readers.
//!
//! The turn loop owns the working grid exclusively; after each turn it
//! publishes the finished generation as an `Arc<Grid>` into a
//! [`SnapshotSlot`]. Readers (the census timer) clone the `Arc` and never
//! observe a grid mid-turn.

use std::sync::{Arc, Mutex, PoisonError};

use halo_core::Grid;

/// A published generation: the grid after `turn` completed turns.
#[derive(Clone, Debug)]
pub struct Published {
    /// Completed turns.
    pub turn: u64,
    /// Immutable grid for that turn.
    pub grid: Arc<Grid>,
}

/// Single-slot, single-producer snapshot holder.
///
/// Only the turn loop calls [`publish`](Self::publish); any thread may call
/// [`latest`](Self::latest). The lock is held only long enough to swap or
/// clone an `Arc`.
#[derive(Debug)]
pub struct SnapshotSlot {
    slot: Mutex<Published>,
}

// Compile-time assertion: SnapshotSlot must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SnapshotSlot>();
};

impl SnapshotSlot {
    /// Create a slot holding the initial generation.
    pub fn new(turn: u64, grid: Arc<Grid>) -> Self {
        Self {
            slot: Mutex::new(Published { turn, grid }),
        }
    }

    /// Replace the published generation.
    pub fn publish(&self, turn: u64, grid: Arc<Grid>) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Published { turn, grid };
    }

    /// Most recently published generation.
    pub fn latest(&self) -> Published {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::Cell;

    #[test]
    fn latest_returns_last_publish() {
        let g0 = Arc::new(Grid::new(4, 4).unwrap());
        let slot = SnapshotSlot::new(0, Arc::clone(&g0));
        assert_eq!(slot.latest().turn, 0);

        let g1 = Arc::new(Grid::from_alive(4, 4, [Cell::new(1, 1)]).unwrap());
        slot.publish(1, Arc::clone(&g1));
        let latest = slot.latest();
        assert_eq!(latest.turn, 1);
        assert!(Arc::ptr_eq(&latest.grid, &g1));
    }

    #[test]
    fn readers_keep_old_generation_alive() {
        let g0 = Arc::new(Grid::from_alive(4, 4, [Cell::new(0, 0)]).unwrap());
        let slot = SnapshotSlot::new(0, g0);
        let held = slot.latest();
        slot.publish(1, Arc::new(Grid::new(4, 4).unwrap()));
        assert_eq!(held.grid.alive_count(), 1);
        assert_eq!(slot.latest().grid.alive_count(), 0);
    }
}
