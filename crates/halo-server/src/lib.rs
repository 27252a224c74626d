//! TCP front end for the Halo engine.
//!
//! A [`Server`] accepts controller connections; each connection becomes a
//! [`ControlSession`] that decodes the handoff, runs a
//! [`TurnEngine`](halo_engine::TurnEngine) on the session thread, and
//! bridges keys and events to the socket through an ingress and an egress
//! thread. [`RemoteController`] is the other end of the wire.
//!
//! # Threads per session
//!
//! ```text
//!  socket --read--> halo-ingress --keys: bounded(10)--> session (TurnEngine)
//!                                                          |   \
//!                                                          |    halo-census
//!                                                          |   /
//!  socket <--write-- halo-egress <--events: bounded(256)---+--+
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod server;
pub mod session;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use controller::{ControllerError, ControllerEvent, ControllerReport, ImageSink, RemoteController};
pub use server::{Server, ServerError};
pub use session::{ControlSession, SessionError, SessionReport};
