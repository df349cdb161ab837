//! Session configuration.

use std::time::Duration;

/// SMTP session configuration.
///
/// The timeouts are a hardening addition over the bare protocol: without
/// them an unresponsive relay blocks a send attempt forever.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP connect deadline.
    pub connect_timeout: Duration,
    /// Per-read deadline while waiting for a reply.
    pub io_timeout: Duration,
    /// Hostname announced in `EHLO`.
    pub ehlo_hostname: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            io_timeout: Duration::from_secs(60),
            ehlo_hostname: "localhost".to_string(),
        }
    }
}

impl Config {
    /// Sets both the connect and the per-read deadline.
    #[must_use]
    pub fn timeouts(mut self, connect: Duration, io: Duration) -> Self {
        self.connect_timeout = connect;
        self.io_timeout = io;
        self
    }

    /// Sets the hostname announced in `EHLO`.
    #[must_use]
    pub fn ehlo_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.ehlo_hostname = hostname.into();
        self
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
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.io_timeout, Duration::from_secs(60));
        assert_eq!(config.ehlo_hostname, "localhost");
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .timeouts(Duration::from_millis(500), Duration::from_secs(5))
            .ehlo_hostname("client.example.com");
        assert_eq!(config.connect_timeout, Duration::from_millis(500));
        assert_eq!(config.io_timeout, Duration::from_secs(5));
        assert_eq!(config.ehlo_hostname, "client.example.com");
    }
}
