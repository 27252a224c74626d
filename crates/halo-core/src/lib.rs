//! Core types for the Halo Game of Life engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the engine, the wire codec, and the server: the
//! toroidal [`Grid`], sparse [`Cell`] coordinates, the birth/survival
//! [`rule`], session [`Params`], controller [`Key`] commands, and the
//! [`Event`] stream emitted by a running engine.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod event;
pub mod grid;
pub mod params;
pub mod rule;

pub use cell::Cell;
pub use error::{GridError, ParamsError};
pub use event::{Event, Key, RunState};
pub use grid::Grid;
pub use params::Params;
