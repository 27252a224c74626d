//! Generation engine for Halo.
//!
//! Splits a toroidal grid into horizontal [`Band`]s with halo rows, advances
//! every band on its own worker thread, and reassembles the next generation
//! ([`ChunkScheduler`]). The [`TurnEngine`] drives the scheduler turn by turn,
//! reacting to controller [`Key`](halo_core::Key)s and emitting
//! [`Event`](halo_core::Event)s, with a cancelable [`CensusTimer`] reporting
//! alive-cell counts on a fixed period.
//!
//! # Architecture
//!
//! ```text
//! Ingress (keys)           Session thread (TurnEngine)          Egress (events)
//!     |                           |                                  |
//!     |--key_tx: bounded(10)----->| commands.try_recv()              |
//!     |                           | scheduler.advance(&grid)         |
//!     |                           |   -> N scoped band workers       |
//!     |                           | slot.publish(turn, grid)         |
//!     |                           |--TurnComplete------------------->|
//!     |                           |                                  |
//!     |                    CensusTimer thread                        |
//!     |                           | tick(period): slot.latest()      |
//!     |                           |--CensusReport------------------->|
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod band;
pub mod census;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod scheduler;
pub mod snapshot;

pub use band::{Band, BandOutput};
pub use census::CensusTimer;
pub use config::{ConfigError, EngineConfig};
pub use engine::{EngineError, EngineReport, Exit, TurnEngine};
pub use metrics::TurnMetrics;
pub use scheduler::{partition, ChunkScheduler};
pub use snapshot::{Published, SnapshotSlot};
