//! Wire protocol for Halo controller sessions.
//!
//! The protocol is newline-delimited ASCII. A controller opens with a
//! [handoff](codec::encode_handoff) (parameters line, alive-cell line), then
//! sends single-character [key](codec::encode_key) lines while the engine
//! streams [events](codec::encode_event): an event-code line followed by a
//! fixed number of payload lines for that code.
//!
//! Every decode returns a typed [`WireError`]; nothing is ever decoded as a
//! silent zero.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;

pub use codec::{
    decode_event, decode_handoff, decode_key, encode_event, encode_handoff, encode_key, EventCode,
    Handoff, MAX_CELL_LINE, MAX_FIELD_LINE,
};
pub use error::WireError;
