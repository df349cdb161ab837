//! `relaypost` - Send one mail message through an SMTP relay from the
//! command line.
//!
//! The outcome maps to the process exit code so scripts can branch on the
//! failure class without parsing stderr.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod send;

use clap::Parser;
use relaypost_smtp::{Config, Error};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "relaypost")]
#[command(version, about = "Send one mail message through an SMTP relay", long_about = None)]
struct Args {
    /// Sender address, used for the From: header and MAIL FROM
    #[arg(long)]
    from: String,

    /// Recipient address, used for the To: header and RCPT TO
    #[arg(long)]
    to: String,

    /// Subject line
    #[arg(long, default_value = "")]
    subject: String,

    /// Message body text
    #[arg(long, conflicts_with = "body_file")]
    body: Option<String>,

    /// Read the message body from a file instead
    #[arg(long)]
    body_file: Option<PathBuf>,

    /// Extra recipient that gets a copy without a header mention (repeatable)
    #[arg(long)]
    bcc: Vec<String>,

    /// AUTH LOGIN username
    #[arg(long)]
    user: String,

    /// AUTH LOGIN password
    #[arg(long)]
    password: String,

    /// Relay hostname
    #[arg(long)]
    relay_host: String,

    /// Relay port
    #[arg(long, default_value_t = 2525)]
    relay_port: u16,

    /// Connect and per-read deadline in milliseconds
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relaypost=info,relaypost_smtp=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let body = match load_body(&args).await {
        Ok(body) => body,
        Err(err) => {
            eprintln!("relaypost: cannot read body: {err}");
            return ExitCode::FAILURE;
        }
    };

    let timeout = Duration::from_millis(args.timeout_ms);
    let request = send::SendRequest {
        from: args.from,
        to: args.to,
        subject: args.subject,
        body,
        bcc: args.bcc,
        user: args.user,
        password: args.password,
        relay_host: args.relay_host,
        relay_port: args.relay_port,
        config: Config::default().timeouts(timeout, timeout),
    };

    match send::send_mail(request).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("relaypost: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn load_body(args: &Args) -> std::io::Result<String> {
    if let Some(path) = &args.body_file {
        return tokio::fs::read_to_string(path).await;
    }
    Ok(args.body.clone().unwrap_or_default())
}

/// Maps a failure to a distinct exit code per error class.
fn exit_code(err: &Error) -> u8 {
    match err {
        Error::Io(_) => 1,
        Error::InvalidAddress(_) => 2,
        Error::UnknownHost { .. } => 3,
        Error::Connect(_) => 4,
        Error::Protocol { .. } => 5,
        Error::MalformedReply(_) => 6,
        Error::Timeout { .. } => 7,
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
    use relaypost_smtp::Stage;

    #[test]
    fn test_each_error_class_has_a_distinct_exit_code() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let cases = [
            (io, 1),
            (Error::InvalidAddress("no @".into()), 2),
            (
                Error::UnknownHost {
                    host: "relay.invalid".into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "nxdomain"),
                },
                3,
            ),
            (Error::Connect("greeting was 554".into()), 4),
            (
                Error::Protocol {
                    stage: Stage::MailFrom,
                    expected: 250,
                    reply: "550 no".into(),
                },
                5,
            ),
            (Error::MalformedReply("garbage".into()), 6),
            (Error::Timeout { stage: Stage::Ehlo }, 7),
        ];

        for (err, code) in cases {
            assert_eq!(exit_code(&err), code, "wrong code for {err}");
        }
    }

    #[test]
    fn test_args_parse_defaults() {
        let args = Args::parse_from([
            "relaypost",
            "--from",
            "a@example.com",
            "--to",
            "b@example.com",
            "--user",
            "u",
            "--password",
            "p",
            "--relay-host",
            "relay.example.com",
        ]);
        assert_eq!(args.relay_port, 2525);
        assert_eq!(args.timeout_ms, 30_000);
        assert!(args.bcc.is_empty());
        assert!(args.body.is_none());
    }

    #[test]
    fn test_bcc_is_repeatable() {
        let args = Args::parse_from([
            "relaypost",
            "--from",
            "a@example.com",
            "--to",
            "b@example.com",
            "--user",
            "u",
            "--password",
            "p",
            "--relay-host",
            "relay.example.com",
            "--bcc",
            "c@example.com",
            "--bcc",
            "d@example.com",
        ]);
        assert_eq!(args.bcc, ["c@example.com", "d@example.com"]);
    }
}
