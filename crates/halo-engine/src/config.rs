//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] holds the server-side knobs that are not part of the
//! per-session [`Params`](halo_core::Params): census cadence, channel
//! capacities, and per-session resource limits. [`validate()`](EngineConfig::validate) checks them at startup.

use std::time::Duration;

use thiserror::Error;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building engine components.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Worker count is zero.
    #[error("worker count must be at least 1")]
    ZeroWorkers,
    /// Census period is zero.
    #[error("census period must be non-zero")]
    ZeroCensusPeriod,
    /// The socket write timeout is zero.
    #[error("write timeout must be non-zero")]
    ZeroWriteTimeout,
    /// A channel capacity or limit is zero.
    #[error("{name} must be at least 1")]
    ZeroCapacity {
        /// Which capacity was zero.
        name: &'static str,
    },
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Server-side configuration shared by every session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Interval between census reports. Default: 2 s.
    pub census_period: Duration,
    /// Pending key commands buffered between ingress and the turn loop.
    /// Default: 10.
    pub command_capacity: usize,
    /// Pending events buffered between the turn loop and egress. A full
    /// buffer applies back-pressure to the turn loop. Default: 256.
    pub event_capacity: usize,
    /// Largest grid, in cells, a handoff may request. Default: 2^24.
    pub max_cells: usize,
    /// How long a single event write may block on a peer that stopped
    /// reading before the session ends. Default: 30 s.
    pub write_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            census_period: Duration::from_secs(2),
            command_capacity: 10,
            event_capacity: 256,
            max_cells: 1 << 24,
            write_timeout: Duration::from_secs(30),
        }
    }
}

impl EngineConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.census_period.is_zero() {
            return Err(ConfigError::ZeroCensusPeriod);
        }
        if self.command_capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                name: "command_capacity",
            });
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                name: "event_capacity",
            });
        }
        if self.max_cells == 0 {
            return Err(ConfigError::ZeroCapacity { name: "max_cells" });
        }
        if self.write_timeout.is_zero() {
            return Err(ConfigError::ZeroWriteTimeout);
        }
        Ok(())
    }
}
