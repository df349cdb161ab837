//! The linear session state machine.

use crate::command::Command;
use crate::connection::{Config, SmtpStream, connect};
use crate::encoding::encode_credential;
use crate::error::{Error, Result};
use crate::parser::{is_last_reply_line, parse_reply};
use crate::types::{Envelope, Reply, Stage};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// One live SMTP conversation.
///
/// The session is a strict linear state machine with no branching
/// recovery: [`open`](Session::open) performs connect, greeting, and
/// `EHLO`; [`send`](Session::send) runs the fixed authentication and
/// transaction sequence; [`close`](Session::close) sends `QUIT`. The first
/// unexpected reply aborts the whole attempt, and the caller is expected
/// to close the session explicitly. A session dropped while still open
/// releases its socket and logs a warning.
#[derive(Debug)]
pub struct Session<S> {
    stream: SmtpStream<S>,
    config: Config,
    closed: bool,
}

impl Session<TcpStream> {
    /// Connects to the envelope's resolved relay address and completes
    /// the greeting and `EHLO` exchange.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if the connect deadline elapses,
    /// [`Error::Connect`] on TCP failure or an unexpected greeting/EHLO
    /// reply. On failure no session exists and the socket is released.
    pub async fn open(envelope: &Envelope, config: Config) -> Result<Self> {
        let stream = connect(envelope.destination_addr, config.connect_timeout).await?;
        tracing::debug!(
            host = %envelope.destination_host,
            addr = %envelope.destination_addr,
            "connected"
        );
        Self::greet(stream, config).await
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Session<S> {
    /// Completes greeting and `EHLO` over an already-open transport.
    ///
    /// # Errors
    ///
    /// Same as [`Session::open`], minus the TCP connect itself.
    pub async fn from_stream(stream: S, config: Config) -> Result<Self> {
        Self::greet(SmtpStream::new(stream), config).await
    }

    async fn greet(stream: SmtpStream<S>, config: Config) -> Result<Self> {
        let mut session = Self {
            stream,
            config,
            closed: false,
        };

        let greeting = session.read_reply(Stage::Connect).await?;
        if greeting.code != Stage::Connect.expect_code() {
            session.closed = true;
            return Err(Error::Connect(format!(
                "unexpected greeting: {}",
                greeting.last_line()
            )));
        }

        let hostname = session.config.ehlo_hostname.clone();
        let reply = session.exchange(Command::Ehlo { hostname }, Stage::Ehlo).await?;
        if reply.code != Stage::Ehlo.expect_code() {
            session.closed = true;
            return Err(Error::Connect(format!(
                "EHLO rejected: {}",
                reply.last_line()
            )));
        }

        Ok(session)
    }

    /// Runs the fixed send sequence for one envelope.
    ///
    /// `AUTH LOGIN`, Base64 username, Base64 password, `MAIL FROM`,
    /// `RCPT TO` for the recipient and each bcc entry, `DATA`, then the
    /// pre-stuffed payload with its terminating `.` line. No step is
    /// retried or skipped.
    ///
    /// # Errors
    ///
    /// [`Error::Protocol`] identifies the failing [`Stage`] and carries
    /// the expected code and the actual reply; after it nothing further
    /// is written and the caller must [`close`](Session::close).
    pub async fn send(&mut self, envelope: &Envelope) -> Result<()> {
        self.expect(Command::AuthLogin, Stage::AuthInitiate).await?;
        self.expect(
            Command::Credential(encode_credential(&envelope.auth_user)),
            Stage::AuthUsername,
        )
        .await?;
        self.expect(
            Command::Credential(encode_credential(&envelope.auth_password)),
            Stage::AuthPassword,
        )
        .await?;

        self.expect(
            Command::MailFrom {
                from: envelope.sender.clone(),
            },
            Stage::MailFrom,
        )
        .await?;
        self.expect(
            Command::RcptTo {
                to: envelope.recipient.clone(),
            },
            Stage::RcptTo,
        )
        .await?;
        for copy in &envelope.bcc {
            self.expect(Command::RcptTo { to: copy.clone() }, Stage::RcptTo)
                .await?;
        }

        self.expect(Command::Data, Stage::Data).await?;
        self.transmit_payload(&envelope.raw_message).await?;
        let reply = self.read_reply(Stage::Payload).await?;
        Self::check(&reply, Stage::Payload)
    }

    /// Sends `QUIT` and marks the session closed.
    ///
    /// Idempotent: a second call is a no-op and writes nothing. A `QUIT`
    /// failure is reported, but the session still counts as closed and
    /// the socket is released when it drops.
    ///
    /// # Errors
    ///
    /// [`Error::Protocol`] if `QUIT` is not answered with 221, or an I/O
    /// error from the write.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.expect(Command::Quit, Stage::Quit).await
    }

    async fn expect(&mut self, cmd: Command, stage: Stage) -> Result<()> {
        let reply = self.exchange(cmd, stage).await?;
        Self::check(&reply, stage)
    }

    async fn exchange(&mut self, cmd: Command, stage: Stage) -> Result<Reply> {
        tracing::debug!(command = %cmd, "client");
        self.write_with_deadline(&cmd.serialize(), stage).await?;
        self.read_reply(stage).await
    }

    /// Writes with the per-operation deadline, so a relay that stops
    /// draining its receive window surfaces a timeout instead of a hang.
    async fn write_with_deadline(&mut self, data: &[u8], stage: Stage) -> Result<()> {
        timeout(self.config.io_timeout, self.stream.write_all(data))
            .await
            .map_err(|_| Error::Timeout { stage })?
    }

    async fn read_reply(&mut self, stage: Stage) -> Result<Reply> {
        let mut lines = Vec::new();
        loop {
            let line = timeout(self.config.io_timeout, self.stream.read_line())
                .await
                .map_err(|_| Error::Timeout { stage })??;
            tracing::debug!(reply = %line, "server");

            let last = is_last_reply_line(&line);
            lines.push(line);
            if last {
                break;
            }
        }

        // Some relays send extra physical lines in the same burst. Whatever
        // complete lines are already buffered belong to this reply; the
        // last one read is authoritative.
        for line in self.stream.drain_buffered_lines() {
            tracing::debug!(reply = %line, "server");
            lines.push(line);
        }
        parse_reply(&lines)
    }

    /// Writes the message text and the `.` terminator.
    ///
    /// The payload is already dot-stuffed; this only guarantees the final
    /// CRLF before the terminator.
    async fn transmit_payload(&mut self, raw: &str) -> Result<()> {
        tracing::debug!(bytes = raw.len(), "client payload");
        self.write_with_deadline(raw.as_bytes(), Stage::Payload)
            .await?;
        if !raw.is_empty() && !raw.ends_with("\r\n") {
            self.write_with_deadline(b"\r\n", Stage::Payload).await?;
        }
        self.write_with_deadline(b".\r\n", Stage::Payload).await
    }

    fn check(reply: &Reply, stage: Stage) -> Result<()> {
        if reply.code == stage.expect_code() {
            Ok(())
        } else {
            Err(Error::Protocol {
                stage,
                expected: stage.expect_code().as_u16(),
                reply: reply.last_line().to_string(),
            })
        }
    }
}

impl<S> Drop for Session<S> {
    fn drop(&mut self) {
        // Last-resort cleanup when the caller abandons the session.
        if !self.closed {
            tracing::warn!("session dropped without close; releasing socket without QUIT");
        }
    }
}
