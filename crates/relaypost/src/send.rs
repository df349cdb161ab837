//! Composition of a single send: message, envelope, session.

use relaypost_message::Message;
use relaypost_smtp::{Config, Envelope, Error, Result, Session};
use tracing::{debug, info, warn};

/// Everything one send attempt needs, collected from the command line.
#[derive(Debug)]
pub struct SendRequest {
    /// Sender address, used for both the `From:` header and `MAIL FROM`.
    pub from: String,
    /// Recipient address, used for both the `To:` header and `RCPT TO`.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
    /// Extra recipients that receive a copy without a header mention.
    pub bcc: Vec<String>,
    /// `AUTH LOGIN` username.
    pub user: String,
    /// `AUTH LOGIN` password.
    pub password: String,
    /// Relay hostname.
    pub relay_host: String,
    /// Relay port.
    pub relay_port: u16,
    /// Session configuration (timeouts, `EHLO` hostname).
    pub config: Config,
}

/// Sends one message through the relay.
///
/// Builds the message, resolves the envelope, then runs the session to
/// completion. The session is closed with `QUIT` even when the transaction
/// fails; a close failure after a send failure is logged, not returned,
/// so the first error always wins.
///
/// # Errors
///
/// Any [`Error`] from address validation, resolution, or the session.
pub async fn send_mail(request: SendRequest) -> Result<()> {
    let message = match Message::new(&request.from, &request.to, &request.subject, &request.body) {
        Ok(message) => message,
        Err(relaypost_message::Error::InvalidAddress(reason)) => {
            return Err(Error::InvalidAddress(reason));
        }
    };

    let mut builder = Envelope::builder()
        .sender(&request.from)
        .recipient(&request.to)
        .credentials(&request.user, &request.password)
        .raw_message(message.to_wire());
    for bcc in &request.bcc {
        builder = builder.bcc(bcc);
    }
    let envelope = builder
        .resolve(&request.relay_host, request.relay_port)
        .await?;

    debug!(
        host = %envelope.destination_host,
        addr = %envelope.destination_addr,
        "relay resolved"
    );

    let mut session = Session::open(&envelope, request.config).await?;
    let sent = session.send(&envelope).await;
    let closed = session.close().await;

    if let Err(send_err) = sent {
        if let Err(close_err) = closed {
            warn!(error = %close_err, "close failed after send error");
        }
        return Err(send_err);
    }
    closed?;

    info!(
        recipient = %envelope.recipient,
        bcc = envelope.bcc.len(),
        "message accepted by relay"
    );
    Ok(())
}
