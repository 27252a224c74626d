//! Error type for the wire codec.

use std::io;

use thiserror::Error;

/// Errors decoding or encoding protocol messages.
#[derive(Debug, Error)]
pub enum WireError {
    /// The peer closed the stream at a message boundary or mid-message.
    #[error("connection closed by peer")]
    Closed,
    /// A read or write on the underlying stream failed.
    #[error("connection lost: {0}")]
    ConnectionLost(#[from] io::Error),
    /// A line could not be parsed.
    #[error("malformed message: {detail}")]
    Malformed {
        /// What was wrong with the line.
        detail: String,
    },
    /// An event-code line named a code outside 1..=7.
    #[error("unknown event code {code}")]
    UnknownEventCode {
        /// The unrecognised code.
        code: u64,
    },
}

impl WireError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }

    /// Whether this error means the peer went away rather than misbehaved.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Closed | Self::ConnectionLost(_))
    }
}
