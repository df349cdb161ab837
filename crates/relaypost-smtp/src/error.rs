//! Error types for SMTP operations.

use crate::types::Stage;
use std::io;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
///
/// All errors are fail-fast: nothing in this crate retries, the caller
/// decides whether to attempt a whole new send.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error on an established connection.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Sender, recipient, or bcc entry is not a usable address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Relay hostname did not resolve to any network address.
    #[error("unknown host {host}: {source}")]
    UnknownHost {
        /// Hostname that failed to resolve.
        host: String,
        /// Underlying resolver error.
        source: io::Error,
    },

    /// TCP connect, greeting, or EHLO failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// A command's reply code did not match the expected code.
    #[error("unexpected reply during {stage}: expected {expected}, got {reply:?}")]
    Protocol {
        /// Step of the command sequence that failed.
        stage: Stage,
        /// Reply code the step requires.
        expected: u16,
        /// Final reply line the server actually sent.
        reply: String,
    },

    /// Reply line did not start with a numeric code.
    #[error("malformed reply: {0:?}")]
    MalformedReply(String),

    /// Connect or read deadline elapsed.
    #[error("timed out during {stage}")]
    Timeout {
        /// Step that was waiting on the relay.
        stage: Stage,
    },
}
