//! Integration tests for the SMTP session.
//!
//! These drive the session against a mock stream with scripted relay
//! replies, so the full command sequence can be asserted byte for byte
//! without a real server. Each script entry arrives as one read, the way
//! a reply burst arrives as one TCP segment.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_possible_truncation)]

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use relaypost_smtp::{Address, Config, Envelope, Error, Session, Stage};

/// Mock stream that returns scripted reply bursts and captures every byte
/// the client writes.
struct MockStream {
    replies: VecDeque<Vec<u8>>,
    sent: Arc<Mutex<Vec<u8>>>,
    /// When true, reads past the script hang instead of reporting EOF.
    pend_after_script: bool,
    /// Remaining bytes of writes the relay accepts; `None` is unlimited.
    write_budget: Option<usize>,
}

impl MockStream {
    fn new(replies: &[&[u8]]) -> (Self, Arc<Mutex<Vec<u8>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                replies: replies.iter().map(|chunk| chunk.to_vec()).collect(),
                sent: Arc::clone(&sent),
                pend_after_script: false,
                write_budget: None,
            },
            sent,
        )
    }

    fn silent_after(replies: &[&[u8]]) -> (Self, Arc<Mutex<Vec<u8>>>) {
        let (mut stream, sent) = Self::new(replies);
        stream.pend_after_script = true;
        (stream, sent)
    }

    /// Stalls writes once `budget` bytes have been accepted.
    fn with_write_budget(mut self, budget: usize) -> Self {
        self.write_budget = Some(budget);
        self
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let Some(mut chunk) = self.replies.pop_front() else {
            if self.pend_after_script {
                // The relay has gone silent; only the timeout can fire.
                return Poll::Pending;
            }
            return Poll::Ready(Ok(()));
        };

        let to_read = chunk.len().min(buf.remaining());
        buf.put_slice(&chunk[..to_read]);
        if to_read < chunk.len() {
            chunk.drain(..to_read);
            self.replies.push_front(chunk);
        }

        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let len = match self.write_budget {
            Some(0) => return Poll::Pending,
            Some(budget) => buf.len().min(budget),
            None => buf.len(),
        };
        if let Some(budget) = self.write_budget.as_mut() {
            *budget -= len;
        }
        self.sent.lock().unwrap().extend_from_slice(&buf[..len]);
        Poll::Ready(Ok(len))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

const RAW_MESSAGE: &str = "From: sender@example.com\r\n\
                           To: recipient@example.com\r\n\
                           Subject: Greetings\r\n\
                           \r\n\
                           Hello\r\n\
                           ..already stuffed\r\n";

fn envelope_with_bcc(bcc: &[&str]) -> Envelope {
    Envelope {
        sender: Address::new("sender@example.com").unwrap(),
        recipient: Address::new("recipient@example.com").unwrap(),
        bcc: bcc.iter().map(|a| Address::new(*a).unwrap()).collect(),
        destination_host: "relay.example.com".to_string(),
        destination_addr: "127.0.0.1:2525".parse().unwrap(),
        raw_message: RAW_MESSAGE.to_string(),
        auth_user: "user".to_string(),
        auth_password: "pass".to_string(),
    }
}

fn envelope() -> Envelope {
    envelope_with_bcc(&[])
}

fn config() -> Config {
    Config::default().timeouts(Duration::from_millis(200), Duration::from_millis(200))
}

fn sent_text(sent: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8(sent.lock().unwrap().clone()).unwrap()
}

#[tokio::test]
async fn full_send_writes_exact_command_sequence() {
    let (stream, sent) = MockStream::new(&[
        b"220 relay.example.com ESMTP\r\n".as_slice(),
        b"250-relay.example.com\r\n250 AUTH LOGIN PLAIN\r\n",
        b"334 VXNlcm5hbWU6\r\n",
        b"334 UGFzc3dvcmQ6\r\n",
        b"235 2.7.0 Authentication successful\r\n",
        b"250 Sender ok\r\n",
        b"250 Recipient ok\r\n",
        b"354 End data with <CR><LF>.<CR><LF>\r\n",
        b"250 Queued\r\n",
        b"221 Bye\r\n",
    ]);

    let envelope = envelope();
    let mut session = Session::from_stream(stream, config()).await.expect("greeting");
    session.send(&envelope).await.expect("send");
    session.close().await.expect("close");

    let expected = format!(
        "EHLO localhost\r\n\
         AUTH LOGIN\r\n\
         dXNlcg==\r\n\
         cGFzcw==\r\n\
         MAIL FROM:<sender@example.com>\r\n\
         RCPT TO:<recipient@example.com>\r\n\
         DATA\r\n\
         {RAW_MESSAGE}.\r\n\
         QUIT\r\n"
    );
    assert_eq!(sent_text(&sent), expected);
}

#[tokio::test]
async fn bcc_entries_each_get_a_rcpt_to() {
    let (stream, sent) = MockStream::new(&[
        b"220 relay\r\n".as_slice(),
        b"250 ok\r\n",
        b"334 u\r\n",
        b"334 p\r\n",
        b"235 ok\r\n",
        b"250 ok\r\n",
        b"250 ok\r\n",
        b"250 ok\r\n",
        b"354 go\r\n",
        b"250 queued\r\n",
        b"221 bye\r\n",
    ]);

    let envelope = envelope_with_bcc(&["copy@example.com"]);
    let mut session = Session::from_stream(stream, config()).await.expect("greeting");
    session.send(&envelope).await.expect("send");
    session.close().await.expect("close");

    let sent = sent_text(&sent);
    assert!(sent.contains("RCPT TO:<recipient@example.com>\r\n"));
    assert!(sent.contains("RCPT TO:<copy@example.com>\r\n"));
}

#[tokio::test]
async fn rejected_mail_from_aborts_at_that_stage() {
    let (stream, sent) = MockStream::new(&[
        b"220 relay\r\n".as_slice(),
        b"250 ok\r\n",
        b"334 u\r\n",
        b"334 p\r\n",
        b"235 ok\r\n",
        b"550 5.1.8 Sender rejected\r\n",
    ]);

    let envelope = envelope();
    let mut session = Session::from_stream(stream, config()).await.expect("greeting");
    let err = session.send(&envelope).await.expect_err("must abort");

    match err {
        Error::Protocol {
            stage,
            expected,
            reply,
        } => {
            assert_eq!(stage, Stage::MailFrom);
            assert_eq!(expected, 250);
            assert!(reply.starts_with("550"));
        }
        other => panic!("expected protocol error, got {other:?}"),
    }

    // Nothing is written after the failing command.
    assert!(sent_text(&sent).ends_with("MAIL FROM:<sender@example.com>\r\n"));
}

#[tokio::test]
async fn multi_line_burst_uses_final_code() {
    let (stream, _sent) = MockStream::new(&[
        b"220 relay\r\n".as_slice(),
        b"250 ok\r\n",
        b"334 u\r\n",
        b"334 p\r\n",
        b"235 ok\r\n",
        b"250-first part\r\n250 second part\r\n",
        b"250 ok\r\n",
        b"354 go\r\n",
        b"250 queued\r\n",
        b"221 bye\r\n",
    ]);

    let envelope = envelope();
    let mut session = Session::from_stream(stream, config()).await.expect("greeting");
    session.send(&envelope).await.expect("burst must count as one reply");
    session.close().await.expect("close");
}

#[tokio::test]
async fn extra_line_in_reply_burst_is_drained() {
    // The EHLO answer carries a second final-form line in the same burst.
    // It belongs to this reply and must not desync the next exchange.
    let (stream, sent) = MockStream::new(&[
        b"220 relay\r\n".as_slice(),
        b"250 ok\r\n250 extra buffered line\r\n",
        b"334 u\r\n",
        b"334 p\r\n",
        b"235 ok\r\n",
        b"250 ok\r\n",
        b"250 ok\r\n",
        b"354 go\r\n",
        b"250 queued\r\n",
        b"221 bye\r\n",
    ]);

    let envelope = envelope();
    let mut session = Session::from_stream(stream, config()).await.expect("greeting");
    session.send(&envelope).await.expect("send");
    session.close().await.expect("close");

    assert!(sent_text(&sent).ends_with("QUIT\r\n"));
}

#[tokio::test]
async fn rejected_greeting_is_a_connect_error() {
    let (stream, sent) = MockStream::new(&[b"554 No SMTP service here\r\n".as_slice()]);

    let err = Session::from_stream(stream, config())
        .await
        .err()
        .expect("must fail");
    assert!(matches!(err, Error::Connect(_)));

    // EHLO is never attempted after a bad greeting.
    assert_eq!(sent_text(&sent), "");
}

#[tokio::test]
async fn rejected_ehlo_is_a_connect_error() {
    let (stream, sent) = MockStream::new(&[
        b"220 relay\r\n".as_slice(),
        b"502 Command not implemented\r\n",
    ]);

    let err = Session::from_stream(stream, config())
        .await
        .err()
        .expect("must fail");
    assert!(matches!(err, Error::Connect(_)));
    assert_eq!(sent_text(&sent), "EHLO localhost\r\n");
}

#[tokio::test]
async fn non_numeric_reply_is_malformed_not_a_panic() {
    let (stream, _sent) = MockStream::new(&[b"BLURB no code here\r\n".as_slice()]);

    let err = Session::from_stream(stream, config())
        .await
        .err()
        .expect("must fail");
    assert!(matches!(err, Error::MalformedReply(_)));
}

#[tokio::test]
async fn close_twice_sends_a_single_quit() {
    let (stream, sent) =
        MockStream::new(&[b"220 relay\r\n".as_slice(), b"250 ok\r\n", b"221 bye\r\n"]);

    let mut session = Session::from_stream(stream, config()).await.expect("greeting");
    session.close().await.expect("first close");
    session.close().await.expect("second close is a no-op");

    assert_eq!(sent_text(&sent).matches("QUIT\r\n").count(), 1);
}

#[tokio::test]
async fn silent_relay_times_out() {
    // Greeting arrives, then the relay goes silent during EHLO.
    let (stream, _sent) = MockStream::silent_after(&[b"220 relay\r\n".as_slice()]);

    let err = Session::from_stream(
        stream,
        Config::default().timeouts(Duration::from_millis(50), Duration::from_millis(50)),
    )
    .await
    .err()
    .expect("must time out");

    assert!(matches!(err, Error::Timeout { stage: Stage::Ehlo }));
}

#[tokio::test]
async fn stalled_write_times_out() {
    // The relay greets but never drains its receive window.
    let (stream, _sent) = MockStream::new(&[b"220 relay\r\n".as_slice()]);
    let stream = stream.with_write_budget(0);

    let err = Session::from_stream(
        stream,
        Config::default().timeouts(Duration::from_millis(50), Duration::from_millis(50)),
    )
    .await
    .err()
    .expect("must time out");

    assert!(matches!(err, Error::Timeout { stage: Stage::Ehlo }));
}

#[tokio::test]
async fn stalled_payload_write_times_out() {
    // Writes stall exactly when the message text begins.
    let handshake = "EHLO localhost\r\n\
                     AUTH LOGIN\r\n\
                     dXNlcg==\r\n\
                     cGFzcw==\r\n\
                     MAIL FROM:<sender@example.com>\r\n\
                     RCPT TO:<recipient@example.com>\r\n\
                     DATA\r\n";
    let (stream, _sent) = MockStream::new(&[
        b"220 relay\r\n".as_slice(),
        b"250 ok\r\n",
        b"334 u\r\n",
        b"334 p\r\n",
        b"235 ok\r\n",
        b"250 ok\r\n",
        b"250 ok\r\n",
        b"354 go\r\n",
    ]);
    let stream = stream.with_write_budget(handshake.len());

    let envelope = envelope();
    let mut session = Session::from_stream(
        stream,
        Config::default().timeouts(Duration::from_millis(50), Duration::from_millis(50)),
    )
    .await
    .expect("greeting");
    let err = session.send(&envelope).await.expect_err("must time out");

    assert!(matches!(err, Error::Timeout { stage: Stage::Payload }));
}

#[tokio::test]
async fn closed_connection_surfaces_an_io_error() {
    // Script ends (EOF) while the client waits for the AUTH challenge.
    let (stream, _sent) = MockStream::new(&[b"220 relay\r\n".as_slice(), b"250 ok\r\n"]);

    let envelope = envelope();
    let mut session = Session::from_stream(stream, config()).await.expect("greeting");
    let err = session.send(&envelope).await.expect_err("must fail");
    assert!(matches!(err, Error::Io(_)));
}
