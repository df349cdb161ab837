//! Dot-stuffing and line-ending preparation for the SMTP `DATA` phase.
//!
//! RFC 5321 terminates `DATA` with a line containing a single `.`, so any
//! body line that starts with `.` must be sent with one extra leading `.`.

/// Dot-stuffs a body: every line whose first character is `.` gains one
/// additional leading `.`.
///
/// Lines are delimited by `\n` and the delimiters are preserved, so the
/// output differs from the input only in the added dots. Header lines must
/// not be passed through this function.
#[must_use]
pub fn dot_stuff(body: &str) -> String {
    let mut stuffed = String::with_capacity(body.len());
    for line in body.split_inclusive('\n') {
        if line.starts_with('.') {
            stuffed.push('.');
        }
        stuffed.push_str(line);
    }
    stuffed
}

/// Reverses [`dot_stuff`]: removes one leading `.` from every line that
/// starts with `.`.
#[must_use]
pub fn dot_unstuff(body: &str) -> String {
    let mut original = String::with_capacity(body.len());
    for line in body.split_inclusive('\n') {
        if let Some(rest) = line.strip_prefix('.') {
            original.push_str(rest);
        } else {
            original.push_str(line);
        }
    }
    original
}

/// Normalizes line endings to CRLF.
///
/// Lines already ending in `\r\n` are left alone; bare `\n` endings gain a
/// `\r`. A final line without any terminator is kept as-is.
#[must_use]
pub fn normalize_crlf(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if let Some(content) = line.strip_suffix('\n') {
            normalized.push_str(content.strip_suffix('\r').unwrap_or(content));
            normalized.push_str("\r\n");
        } else {
            normalized.push_str(line);
        }
    }
    normalized
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
    use proptest::prelude::*;

    #[test]
    fn test_dot_stuff_plain_body_unchanged() {
        let body = "Hello\nWorld\n";
        assert_eq!(dot_stuff(body), body);
    }

    #[test]
    fn test_dot_stuff_leading_dot() {
        assert_eq!(dot_stuff(".hidden\n"), "..hidden\n");
    }

    #[test]
    fn test_dot_stuff_lone_terminator_line() {
        // A body line of exactly "." must never look like the terminator.
        assert_eq!(dot_stuff("before\n.\nafter\n"), "before\n..\nafter\n");
    }

    #[test]
    fn test_dot_stuff_only_first_column() {
        assert_eq!(dot_stuff("a.b\nc.\n"), "a.b\nc.\n");
    }

    #[test]
    fn test_dot_stuff_no_trailing_newline() {
        assert_eq!(dot_stuff("."), "..");
        assert_eq!(dot_stuff("last\n.end"), "last\n..end");
    }

    #[test]
    fn test_dot_stuff_empty_body() {
        assert_eq!(dot_stuff(""), "");
    }

    #[test]
    fn test_dot_unstuff_recovers() {
        let body = ".\n..already doubled\ntext\n";
        assert_eq!(dot_unstuff(&dot_stuff(body)), body);
    }

    #[test]
    fn test_normalize_crlf() {
        assert_eq!(normalize_crlf("a\nb\r\nc"), "a\r\nb\r\nc");
        assert_eq!(normalize_crlf(""), "");
        assert_eq!(normalize_crlf("\n"), "\r\n");
    }

    proptest! {
        // Round-trip law: un-stuffing a stuffed body recovers it exactly.
        #[test]
        fn prop_dot_stuff_round_trips(body in "[ -~\n]{0,200}") {
            prop_assert_eq!(dot_unstuff(&dot_stuff(&body)), body);
        }

        // No stuffed line may consist of a single ".".
        #[test]
        fn prop_stuffed_body_has_no_bare_terminator(body in "[ -~\n]{0,200}") {
            let stuffed = dot_stuff(&body);
            for line in stuffed.split('\n') {
                prop_assert_ne!(line.trim_end_matches('\r'), ".");
            }
        }
    }
}
