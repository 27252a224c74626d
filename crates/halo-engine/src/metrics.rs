//! Per-session turn metrics.
//!
//! [`TurnMetrics`] accumulates timing and command counts over the life of a
//! [`TurnEngine`](crate::TurnEngine). The session logs them at teardown.

/// Timing and command counters collected by the turn loop.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnMetrics {
    /// Completed turns.
    pub turns: u64,
    /// Wall-clock time of the most recent `advance`, in microseconds.
    pub last_advance_us: u64,
    /// Total time spent in `advance`, in microseconds.
    pub total_advance_us: u64,
    /// Snapshot (render) requests handled.
    pub snapshots: u64,
    /// Pause transitions.
    pub pauses: u64,
    /// Resume transitions.
    pub resumes: u64,
}

impl TurnMetrics {
    /// Record one completed `advance` that took `us` microseconds.
    pub fn record_advance(&mut self, us: u64) {
        self.turns += 1;
        self.last_advance_us = us;
        self.total_advance_us = self.total_advance_us.saturating_add(us);
    }

    /// Mean `advance` time in microseconds, or 0 before the first turn.
    pub fn mean_advance_us(&self) -> u64 {
        self.total_advance_us.checked_div(self.turns).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = TurnMetrics::default();
        assert_eq!(m.turns, 0);
        assert_eq!(m.mean_advance_us(), 0);
    }

    #[test]
    fn record_advance_accumulates() {
        let mut m = TurnMetrics::default();
        m.record_advance(100);
        m.record_advance(300);
        assert_eq!(m.turns, 2);
        assert_eq!(m.last_advance_us, 300);
        assert_eq!(m.total_advance_us, 400);
        assert_eq!(m.mean_advance_us(), 200);
    }
}
