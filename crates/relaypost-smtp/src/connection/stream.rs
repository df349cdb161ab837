//! Low-level SMTP stream handling.

use crate::error::{Error, Result};
use crate::types::Stage;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Buffered line-oriented stream to the relay.
///
/// Generic over the underlying transport so sessions can be driven by an
/// in-memory stream in tests.
#[derive(Debug)]
pub struct SmtpStream<S> {
    reader: BufReader<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> SmtpStream<S> {
    /// Wraps a transport in a buffered SMTP stream.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::new(stream),
        }
    }

    /// Reads one CRLF-terminated line, with the terminator stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the relay closed the
    /// connection.
    pub async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "relay closed the connection",
            )));
        }
        Ok(line.trim_end().to_string())
    }

    /// Consumes complete lines already sitting in the read buffer, without
    /// touching the network. Terminators are stripped.
    ///
    /// A reply burst can carry extra physical lines beyond the final-form
    /// one; anything left unread here would be mistaken for the reply to
    /// the next command. Partial lines stay buffered.
    pub fn drain_buffered_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            let buffered = self.reader.buffer();
            let Some(end) = buffered.iter().position(|&b| b == b'\n') else {
                break;
            };
            let line = String::from_utf8_lossy(&buffered[..end])
                .trim_end()
                .to_string();
            lines.push(line);
            Pin::new(&mut self.reader).consume(end + 1);
        }
        lines
    }

    /// Writes data to the stream and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.reader.get_mut().write_all(data).await?;
        self.reader.get_mut().flush().await?;
        Ok(())
    }
}

/// Opens a TCP connection to the resolved relay address.
///
/// # Errors
///
/// [`Error::Timeout`] if the deadline elapses, [`Error::Connect`] if the
/// connection is refused or otherwise fails.
pub async fn connect(addr: SocketAddr, timeout: Duration) -> Result<SmtpStream<TcpStream>> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| Error::Timeout {
            stage: Stage::Connect,
        })?
        .map_err(|e| Error::Connect(format!("{addr}: {e}")))?;

    Ok(SmtpStream::new(stream))
}
