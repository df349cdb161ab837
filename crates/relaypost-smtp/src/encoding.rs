//! Transport-safe credential encoding for `AUTH LOGIN`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encodes a username or password as standard Base64 for the `AUTH LOGIN`
/// challenge/response exchange.
///
/// No line folding is applied; credentials are short.
#[must_use]
pub fn encode_credential(secret: &str) -> String {
    STANDARD.encode(secret.as_bytes())
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
    fn test_encode_credential() {
        assert_eq!(encode_credential("user"), "dXNlcg==");
        assert_eq!(encode_credential("pass"), "cGFzcw==");
    }

    #[test]
    fn test_encode_credential_empty() {
        assert_eq!(encode_credential(""), "");
    }

    #[test]
    fn test_encode_credential_non_ascii() {
        assert_eq!(encode_credential("pä55"), "cMOkNTU=");
    }
}
