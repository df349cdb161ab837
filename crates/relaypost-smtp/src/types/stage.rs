//! The steps of the linear session state machine.

use crate::types::ReplyCode;
use std::fmt;

/// One step of the fixed command sequence.
///
/// Every step awaits exactly one reply code; an unexpected reply at stage
/// *k* is a first-class value carried by
/// [`Error::Protocol`](crate::Error::Protocol) rather than a bare string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// TCP connect and the 220 service greeting.
    Connect,
    /// `EHLO <local-hostname>`.
    Ehlo,
    /// `AUTH LOGIN`.
    AuthInitiate,
    /// Base64 username line.
    AuthUsername,
    /// Base64 password line.
    AuthPassword,
    /// `MAIL FROM:<sender>`.
    MailFrom,
    /// `RCPT TO:<recipient>` (including any bcc entries).
    RcptTo,
    /// `DATA`.
    Data,
    /// Message text plus the terminating `.` line.
    Payload,
    /// `QUIT`.
    Quit,
}

impl Stage {
    /// The single reply code this step requires.
    #[must_use]
    pub const fn expect_code(self) -> ReplyCode {
        match self {
            Self::Connect => ReplyCode::SERVICE_READY,
            Self::Ehlo | Self::MailFrom | Self::RcptTo | Self::Payload => ReplyCode::OK,
            Self::AuthInitiate | Self::AuthUsername => ReplyCode::AUTH_CONTINUE,
            Self::AuthPassword => ReplyCode::AUTH_SUCCESS,
            Self::Data => ReplyCode::START_DATA,
            Self::Quit => ReplyCode::CLOSING,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connect => "connect",
            Self::Ehlo => "EHLO",
            Self::AuthInitiate => "AUTH LOGIN",
            Self::AuthUsername => "AUTH username",
            Self::AuthPassword => "AUTH password",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Data => "DATA",
            Self::Payload => "message payload",
            Self::Quit => "QUIT",
        };
        f.write_str(name)
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
    fn test_expected_codes() {
        assert_eq!(Stage::Connect.expect_code().as_u16(), 220);
        assert_eq!(Stage::Ehlo.expect_code().as_u16(), 250);
        assert_eq!(Stage::AuthInitiate.expect_code().as_u16(), 334);
        assert_eq!(Stage::AuthUsername.expect_code().as_u16(), 334);
        assert_eq!(Stage::AuthPassword.expect_code().as_u16(), 235);
        assert_eq!(Stage::MailFrom.expect_code().as_u16(), 250);
        assert_eq!(Stage::RcptTo.expect_code().as_u16(), 250);
        assert_eq!(Stage::Data.expect_code().as_u16(), 354);
        assert_eq!(Stage::Payload.expect_code().as_u16(), 250);
        assert_eq!(Stage::Quit.expect_code().as_u16(), 221);
    }

    #[test]
    fn test_display() {
        assert_eq!(Stage::MailFrom.to_string(), "MAIL FROM");
        assert_eq!(Stage::Payload.to_string(), "message payload");
    }
}
