//! Halo: a parallel Game of Life engine on a torus, driven over TCP.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Halo sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use halo::prelude::*;
//!
//! // Horizontal blinker on a 5x5 torus, advanced by two band workers.
//! let grid = Grid::from_alive(5, 5, [Cell::new(1, 2), Cell::new(2, 2), Cell::new(3, 2)]).unwrap();
//! let scheduler = ChunkScheduler::new(2).unwrap();
//! let next = scheduler.advance(&grid);
//! assert_eq!(next.alive_cells(), vec![Cell::new(2, 1), Cell::new(2, 2), Cell::new(2, 3)]);
//! assert_eq!(scheduler.advance(&next), grid);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `halo-core` | Grid, cells, rule, params, keys, events |
//! | [`engine`] | `halo-engine` | Band scheduler, census timer, turn engine |
//! | [`wire`] | `halo-wire` | Text protocol codec |
//! | [`server`] | `halo-server` | TCP server, sessions, remote controller |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid, cells, rule, and protocol vocabulary (`halo-core`).
pub use halo_core as types;

/// Banded parallel generation and the turn state machine (`halo-engine`).
pub use halo_engine as engine;

/// Line-oriented protocol codec (`halo-wire`).
pub use halo_wire as wire;

/// TCP server, control sessions, and the remote controller (`halo-server`).
pub use halo_server as server;

/// Common imports for typical Halo usage.
pub mod prelude {
    // Core types
    pub use halo_core::{Cell, Event, Grid, Key, Params, RunState};

    // Errors
    pub use halo_core::{GridError, ParamsError};
    pub use halo_wire::WireError;

    // Engine
    pub use halo_engine::{ChunkScheduler, EngineConfig, EngineReport, Exit, TurnEngine};

    // Server
    pub use halo_server::{ControllerEvent, ImageSink, RemoteController, Server, ServerConfig};
}
