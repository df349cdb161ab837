//! The transport envelope for one send attempt.

use crate::error::{Error, Result};
use crate::types::Address;
use std::io;
use std::net::SocketAddr;
use tokio::net::lookup_host;

/// Transport wrapper around one message: routing, credentials, and the
/// pre-rendered `DATA` payload.
///
/// An envelope is built once per send attempt and consumed by exactly one
/// [`Session`](crate::Session). `raw_message` must already be dot-stuffed;
/// the session appends only the terminating `.` line.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// SMTP sender (`MAIL FROM`).
    pub sender: Address,
    /// SMTP recipient (`RCPT TO`).
    pub recipient: Address,
    /// Additional recipients that receive a copy without appearing in the
    /// message headers. Empty unless the caller opts in.
    pub bcc: Vec<Address>,
    /// Relay hostname as configured.
    pub destination_host: String,
    /// Resolved relay network address.
    pub destination_addr: SocketAddr,
    /// Header block plus dot-stuffed body.
    pub raw_message: String,
    /// `AUTH LOGIN` username.
    pub auth_user: String,
    /// `AUTH LOGIN` password.
    pub auth_password: String,
}

impl Envelope {
    /// Starts building an envelope.
    #[must_use]
    pub fn builder() -> EnvelopeBuilder {
        EnvelopeBuilder::default()
    }
}

/// Builder for [`Envelope`].
#[derive(Debug, Default)]
pub struct EnvelopeBuilder {
    sender: String,
    recipient: String,
    bcc: Vec<String>,
    auth_user: String,
    auth_password: String,
    raw_message: String,
}

impl EnvelopeBuilder {
    /// Sets the SMTP sender address.
    #[must_use]
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Sets the SMTP recipient address.
    #[must_use]
    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }

    /// Adds a bcc recipient.
    #[must_use]
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Sets the `AUTH LOGIN` credentials.
    #[must_use]
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth_user = user.into();
        self.auth_password = password.into();
        self
    }

    /// Sets the pre-rendered, dot-stuffed `DATA` payload.
    #[must_use]
    pub fn raw_message(mut self, raw_message: impl Into<String>) -> Self {
        self.raw_message = raw_message.into();
        self
    }

    /// Validates the addresses, then resolves the relay host.
    ///
    /// Validation happens before the lookup, so an invalid address never
    /// causes any network activity. No connection is opened here either
    /// way; that is [`Session::open`](crate::Session::open)'s job.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for a malformed sender, recipient, or bcc
    /// entry; [`Error::UnknownHost`] if `relay_host` does not resolve.
    pub async fn resolve(self, relay_host: &str, relay_port: u16) -> Result<Envelope> {
        let sender = Address::new(self.sender)?;
        let recipient = Address::new(self.recipient)?;
        let bcc = self
            .bcc
            .into_iter()
            .map(Address::new)
            .collect::<Result<Vec<_>>>()?;

        let destination_addr = lookup_host((relay_host, relay_port))
            .await
            .map_err(|source| Error::UnknownHost {
                host: relay_host.to_string(),
                source,
            })?
            .next()
            .ok_or_else(|| Error::UnknownHost {
                host: relay_host.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "resolver returned no addresses"),
            })?;

        Ok(Envelope {
            sender,
            recipient,
            bcc,
            destination_host: relay_host.to_string(),
            destination_addr,
            raw_message: self.raw_message,
            auth_user: self.auth_user,
            auth_password: self.auth_password,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sender_fails_before_resolution() {
        // The relay host is unresolvable; an address error must win,
        // proving validation happens before any lookup.
        let result = tokio_test::block_on(
            Envelope::builder()
                .sender("not-an-address")
                .recipient("ok@example.com")
                .resolve("relay.invalid", 2525),
        );
        assert!(matches!(result, Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_invalid_bcc_fails_before_resolution() {
        let result = tokio_test::block_on(
            Envelope::builder()
                .sender("a@example.com")
                .recipient("b@example.com")
                .bcc("no-at-sign")
                .resolve("relay.invalid", 2525),
        );
        assert!(matches!(result, Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_unknown_host() {
        let result = tokio_test::block_on(
            Envelope::builder()
                .sender("a@example.com")
                .recipient("b@example.com")
                .resolve("relay.invalid", 2525),
        );
        assert!(matches!(result, Err(Error::UnknownHost { .. })));
    }

    #[test]
    fn test_resolve_localhost() {
        let envelope = tokio_test::block_on(
            Envelope::builder()
                .sender("a@example.com")
                .recipient("b@example.com")
                .credentials("user", "pass")
                .raw_message("Subject: x\r\n\r\nbody\r\n")
                .resolve("localhost", 2525),
        )
        .unwrap();

        assert_eq!(envelope.destination_host, "localhost");
        assert_eq!(envelope.destination_addr.port(), 2525);
        assert!(envelope.bcc.is_empty());
    }
}
