//! Server configuration.

use std::net::SocketAddr;

use halo_engine::{ConfigError, EngineConfig};

/// Port the server listens on by default.
pub const DEFAULT_PORT: u16 = 8030;

/// Listener address plus the engine configuration applied to every session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind. Default: `0.0.0.0:8030`.
    pub bind_addr: SocketAddr,
    /// Per-session engine configuration.
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()
    }
}
