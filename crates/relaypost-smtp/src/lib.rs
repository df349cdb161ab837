//! # relaypost-smtp
//!
//! A minimal SMTP submission client: one envelope, one socket, one linear
//! command sequence.
//!
//! ## Features
//!
//! - **Linear session state machine**: connect, greeting, `EHLO`,
//!   `AUTH LOGIN`, `MAIL FROM`, `RCPT TO`, `DATA`, `QUIT`, with the failing
//!   [`Stage`] carried in every protocol error
//! - **Strict reply checking**: each command expects exactly one reply
//!   code; the first mismatch aborts the session
//! - **Multi-line replies**: continuation lines and any further buffered
//!   lines of the burst are drained; only the last line's code is compared
//! - **Timeouts**: connect and per-read deadlines so an unresponsive relay
//!   surfaces [`Error::Timeout`] instead of hanging (the original protocol
//!   has none; this is a deliberate hardening addition)
//!
//! ## Quick Start
//!
//! ```ignore
//! use relaypost_smtp::{Config, Envelope, Session};
//!
//! #[tokio::main]
//! async fn main() -> relaypost_smtp::Result<()> {
//!     let envelope = Envelope::builder()
//!         .sender("sender@example.com")
//!         .recipient("recipient@example.com")
//!         .credentials("user", "password")
//!         .raw_message("Subject: Hi\r\n\r\nHello\r\n")
//!         .resolve("relay.example.com", 2525)
//!         .await?;
//!
//!     let config = Config::default();
//!     let mut session = Session::open(&envelope, config).await?;
//!     session.send(&envelope).await?;
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Session States
//!
//! ```text
//! Disconnected ── open() ──→ Greeted ── send() ──→ Transacted
//!        │                      │                      │
//!        └──── any failure ─────┴───── close() ────────┴──→ Closed
//! ```
//!
//! There is no branching recovery: any unexpected reply aborts and the
//! caller must close the session. A session dropped without closing
//! releases its socket and logs a warning.
//!
//! ## Modules
//!
//! - [`command`]: SMTP command builders
//! - [`connection`]: Stream, configuration, and the session state machine
//! - [`parser`]: Reply parser
//! - [`types`]: Addresses, envelopes, replies, and stages

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod encoding;
mod error;
pub mod parser;
pub mod types;

pub use connection::{Config, Session, SmtpStream, connect};
pub use encoding::encode_credential;
pub use error::{Error, Result};
pub use types::{Address, Envelope, EnvelopeBuilder, Reply, ReplyCode, Stage};
