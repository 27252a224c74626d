//! The B3/S23 birth/survival rule.

/// Next state of a cell given its current state and live-neighbour count.
///
/// An alive cell survives with 2 or 3 neighbours; a dead cell is born with
/// exactly 3. Everything else is dead in the next generation.
///
/// # Examples
///
/// ```
/// use halo_core::rule::next_state;
///
/// assert!(next_state(true, 2));
/// assert!(next_state(false, 3));
/// assert!(!next_state(true, 4));
/// assert!(!next_state(false, 2));
/// ```
#[inline]
pub fn next_state(alive: bool, neighbours: u8) -> bool {
    matches!((alive, neighbours), (true, 2) | (true, 3) | (false, 3))
}
