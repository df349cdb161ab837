//! Outgoing message assembly.

use crate::error::{Error, Result};
use crate::stuffing::{dot_stuff, normalize_crlf};
use std::fmt::Write as _;

/// A single outgoing mail message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Sender address (contents of the `From:` header).
    pub from: String,
    /// Recipient address (contents of the `To:` header).
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body. May be empty.
    pub body: String,
}

impl Message {
    /// Creates a message, validating sender and recipient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `from` or `to` is empty or is
    /// not a `local@domain` pair.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self> {
        let from = from.into();
        let to = to.into();
        validate_address(&from, "sender")?;
        validate_address(&to, "recipient")?;

        Ok(Self {
            from,
            to,
            subject: subject.into(),
            body: body.into(),
        })
    }

    /// Renders the `DATA` payload: header block, blank line, dot-stuffed
    /// body, CRLF line endings throughout.
    ///
    /// The terminating `.` line is not included here; the session appends
    /// it when transmitting.
    #[must_use]
    pub fn to_wire(&self) -> String {
        let mut wire = String::new();

        let _ = write!(wire, "From: {}\r\n", self.from);
        let _ = write!(wire, "To: {}\r\n", self.to);
        let _ = write!(wire, "Subject: {}\r\n", self.subject);
        wire.push_str("\r\n");

        // Headers are never stuffed; only the body is.
        wire.push_str(&dot_stuff(&normalize_crlf(&self.body)));
        wire
    }
}

/// Validates that an address is a plausible `local@domain` pair.
///
/// This is a presence check, not full RFC 5321 syntax validation.
fn validate_address(addr: &str, role: &str) -> Result<()> {
    if addr.is_empty() {
        return Err(Error::InvalidAddress(format!("{role} cannot be empty")));
    }

    let Some((local, domain)) = addr.split_once('@') else {
        return Err(Error::InvalidAddress(format!(
            "{role} {addr:?} must contain @"
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(Error::InvalidAddress(format!(
            "{role} {addr:?} must be a local@domain pair"
        )));
    }

    Ok(())
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
    fn test_message_new() {
        let message = Message::new("a@example.com", "b@example.com", "Hi", "Body").unwrap();
        assert_eq!(message.from, "a@example.com");
        assert_eq!(message.to, "b@example.com");
    }

    #[test]
    fn test_message_rejects_missing_at() {
        assert!(Message::new("aexample.com", "b@example.com", "", "").is_err());
        assert!(Message::new("a@example.com", "bexample.com", "", "").is_err());
    }

    #[test]
    fn test_message_rejects_empty_addresses() {
        assert!(Message::new("", "b@example.com", "", "").is_err());
        assert!(Message::new("a@example.com", "", "", "").is_err());
        assert!(Message::new("@example.com", "b@example.com", "", "").is_err());
        assert!(Message::new("a@", "b@example.com", "", "").is_err());
    }

    #[test]
    fn test_message_rejects_double_at() {
        assert!(Message::new("a@b@example.com", "b@example.com", "", "").is_err());
    }

    #[test]
    fn test_message_allows_empty_body() {
        let message = Message::new("a@example.com", "b@example.com", "Subject only", "").unwrap();
        assert_eq!(
            message.to_wire(),
            "From: a@example.com\r\nTo: b@example.com\r\nSubject: Subject only\r\n\r\n"
        );
    }

    #[test]
    fn test_to_wire_layout() {
        let message = Message::new("a@example.com", "b@example.com", "Hi", "line1\nline2\n").unwrap();
        assert_eq!(
            message.to_wire(),
            "From: a@example.com\r\nTo: b@example.com\r\nSubject: Hi\r\n\r\nline1\r\nline2\r\n"
        );
    }

    #[test]
    fn test_to_wire_stuffs_body_only() {
        let message =
            Message::new("a@example.com", "b@example.com", ".dotted subject", ".\n").unwrap();
        let wire = message.to_wire();
        // The subject keeps its dot; the body line is doubled.
        assert!(wire.contains("Subject: .dotted subject\r\n"));
        assert!(wire.ends_with("\r\n\r\n..\r\n"));
    }
}
