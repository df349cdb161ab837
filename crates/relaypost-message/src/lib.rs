//! # relaypost-message
//!
//! Construction of outgoing mail messages for SMTP submission.
//!
//! ## Features
//!
//! - **Message building**: Assemble a header block plus body into the
//!   text transmitted during the SMTP `DATA` phase
//! - **Address checks**: Reject sender/recipient strings that cannot be
//!   an address before anything touches the network
//! - **Dot-stuffing**: Escape body lines so a line consisting of a single
//!   `.` never terminates the `DATA` phase early
//!
//! ## Quick Start
//!
//! ```ignore
//! use relaypost_message::Message;
//!
//! let message = Message::new(
//!     "sender@example.com",
//!     "recipient@example.com",
//!     "Hello",
//!     "First line\n.starts with a dot\n",
//! )?;
//!
//! // Headers, blank line, dot-stuffed body, CRLF line endings.
//! let payload = message.to_wire();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod message;

pub mod stuffing;

pub use error::{Error, Result};
pub use message::Message;
