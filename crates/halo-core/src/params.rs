//! Per-session simulation parameters.

use crate::error::ParamsError;

/// Parameters supplied by the controller at session start.
///
/// Immutable for the lifetime of a session. `worker_count` is the number of
/// horizontal bands the grid is split into on every turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Params {
    /// Grid width (columns).
    pub width: usize,
    /// Grid height (rows).
    pub height: usize,
    /// Number of concurrent band workers per turn.
    pub worker_count: usize,
    /// Number of turns to run before delivering the final state.
    pub turn_limit: u64,
}

impl Params {
    /// Check structural invariants.
    ///
    /// A `turn_limit` of zero is valid: the session delivers the final state
    /// of the initial grid without advancing.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.width == 0 || self.height == 0 {
            return Err(ParamsError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.worker_count == 0 {
            return Err(ParamsError::ZeroWorkers);
        }
        if self.worker_count > self.height {
            return Err(ParamsError::TooManyWorkers {
                workers: self.worker_count,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Check that the grid has at most `max_cells` cells.
    pub fn check_cells(&self, max_cells: usize) -> Result<(), ParamsError> {
        match self.width.checked_mul(self.height) {
            Some(n) if n <= max_cells => Ok(()),
            _ => Err(ParamsError::TooManyCells {
                width: self.width,
                height: self.height,
                max_cells,
            }),
        }
    }
}
