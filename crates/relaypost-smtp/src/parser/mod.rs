//! SMTP reply parser.

use crate::error::{Error, Result};
use crate::types::{Reply, ReplyCode};

/// Parses an SMTP reply from the physical lines of one burst.
///
/// SMTP replies can be single-line or multi-line:
/// - Single: `250 OK`
/// - Multi: `250-First line`, `250-Second line`, `250 Last line`
///
/// Only the final line's code is authoritative. The code is the first
/// token when splitting on spaces and hyphens, so both `250 OK` and
/// `250-greeting` parse as 250.
///
/// # Errors
///
/// Returns [`Error::MalformedReply`] if the burst is empty or the final
/// line does not start with a 3-digit numeric code.
pub fn parse_reply(lines: &[String]) -> Result<Reply> {
    let last = lines
        .last()
        .ok_or_else(|| Error::MalformedReply("empty reply".to_string()))?;

    let token = last
        .split([' ', '-'])
        .next()
        .unwrap_or_default();

    if token.len() != 3 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedReply(last.clone()));
    }

    let code = token
        .parse::<u16>()
        .map_err(|_| Error::MalformedReply(last.clone()))?;

    Ok(Reply::new(ReplyCode::new(code), lines.to_vec()))
}

/// Checks if a line is the last line of a multi-line reply.
///
/// Continuation lines carry `-` after the code (`250-...`); the last line
/// uses a space or is the bare code.
#[must_use]
pub fn is_last_reply_line(line: &str) -> bool {
    line.len() < 4 || line.as_bytes()[3] != b'-'
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
    fn test_parse_single_line_reply() {
        let lines = vec!["250 OK".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 250);
        assert!(reply.is_success());
    }

    #[test]
    fn test_parse_multi_line_reply_uses_last_code() {
        let lines = vec![
            "250-relay.example.com".to_string(),
            "250-SIZE 35882577".to_string(),
            "354 surprising final line".to_string(),
        ];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 354);
        assert_eq!(reply.last_line(), "354 surprising final line");
    }

    #[test]
    fn test_parse_hyphen_separated_code() {
        let lines = vec!["220-relay.example.com ESMTP".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 220);
    }

    #[test]
    fn test_parse_bare_code() {
        let lines = vec!["250".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 250);
    }

    #[test]
    fn test_parse_error_empty() {
        assert!(matches!(parse_reply(&[]), Err(Error::MalformedReply(_))));
    }

    #[test]
    fn test_parse_error_non_numeric() {
        let lines = vec!["ABC nonsense".to_string()];
        assert!(matches!(
            parse_reply(&lines),
            Err(Error::MalformedReply(_))
        ));
    }

    #[test]
    fn test_parse_error_short_code() {
        let lines = vec!["25 truncated".to_string()];
        assert!(matches!(
            parse_reply(&lines),
            Err(Error::MalformedReply(_))
        ));
    }

    #[test]
    fn test_is_last_reply_line() {
        assert!(is_last_reply_line("250 OK"));
        assert!(is_last_reply_line("250"));
        assert!(!is_last_reply_line("250-Continuing"));
    }
}
