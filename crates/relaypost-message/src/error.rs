//! Error types for message construction.

/// Result type alias for message operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message construction error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sender or recipient is not a usable address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
