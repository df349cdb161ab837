//! SMTP reply types.

/// SMTP reply from the server.
///
/// Holds every physical line of a (possibly multi-line) reply; the code is
/// taken from the final line, which is the authoritative one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply code from the final line (e.g., 250).
    pub code: ReplyCode,
    /// Raw reply lines as received, CRLF stripped.
    pub lines: Vec<String>,
}

impl Reply {
    /// Creates a new reply.
    #[must_use]
    pub const fn new(code: ReplyCode, lines: Vec<String>) -> Self {
        Self { code, lines }
    }

    /// Returns the authoritative (final) reply line.
    #[must_use]
    pub fn last_line(&self) -> &str {
        self.lines.last().map_or("", String::as_str)
    }

    /// Returns true if this is a success reply (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a success code (2xx).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// The codes this client expects during its command sequence.
impl ReplyCode {
    /// 220 Service ready
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel
    pub const CLOSING: Self = Self(221);
    /// 235 Authentication successful
    pub const AUTH_SUCCESS: Self = Self(235);
    /// 250 Requested mail action okay, completed
    pub const OK: Self = Self(250);
    /// 334 Continue with authentication
    pub const AUTH_CONTINUE: Self = Self(334);
    /// 354 Start mail input
    pub const START_DATA: Self = Self(354);
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
    fn test_success_codes() {
        assert!(ReplyCode::OK.is_success());
        assert!(ReplyCode::SERVICE_READY.is_success());
        assert!(ReplyCode::CLOSING.is_success());
        assert!(!ReplyCode::AUTH_CONTINUE.is_success());
        assert!(!ReplyCode::START_DATA.is_success());
        assert!(!ReplyCode::new(550).is_success());
    }

    #[test]
    fn test_display() {
        assert_eq!(ReplyCode::OK.to_string(), "250");
        assert_eq!(ReplyCode::AUTH_SUCCESS.to_string(), "235");
    }

    #[test]
    fn test_reply_last_line() {
        let reply = Reply::new(
            ReplyCode::OK,
            vec!["250-first".to_string(), "250 last".to_string()],
        );
        assert_eq!(reply.last_line(), "250 last");
        assert!(reply.is_success());
    }

    #[test]
    fn test_reply_last_line_empty() {
        let reply = Reply::new(ReplyCode::OK, vec![]);
        assert_eq!(reply.last_line(), "");
    }
}
