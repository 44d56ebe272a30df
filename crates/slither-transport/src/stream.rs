//! [`Connection`] over any async buffered reader and writer.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{Connection, TransportError};

/// A [`Connection`] built from a reader/writer pair.
///
/// `R` is typically `BufReader<Stdin>` and `W` is `Stdout`; tests use `&[u8]`
/// and `Vec<u8>`.
pub struct StreamConnection<R, W> {
    reader: R,
    writer: W,
    received: u64,
    sent: u64,
}

impl<R, W> StreamConnection<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            received: 0,
            sent: 0,
        }
    }

    /// Borrows the writer, e.g. to inspect what was sent in tests.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Splits the connection back into its reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R, W> Connection for StreamConnection<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn recv_line(&mut self) -> Result<Option<String>, TransportError> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        if n == 0 {
            tracing::debug!(received = self.received, "input stream reached EOF");
            return Ok(None);
        }

        // Strip the terminator in place; a final line without one is kept as is.
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        self.received += 1;
        tracing::trace!(n = self.received, %line, "recv");
        Ok(Some(line))
    }

    async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(TransportError::SendFailed)?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(TransportError::SendFailed)?;
        self.writer
            .flush()
            .await
            .map_err(TransportError::SendFailed)?;
        self.sent += 1;
        tracing::trace!(n = self.sent, line, "sent");
        Ok(())
    }

    fn lines_received(&self) -> u64 {
        self.received
    }

    fn lines_sent(&self) -> u64 {
        self.sent
    }
}

/// A [`StreamConnection`] over the process's stdin and stdout.
#[cfg(feature = "stdio")]
pub type StdioConnection = StreamConnection<tokio::io::BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

#[cfg(feature = "stdio")]
impl StdioConnection {
    /// Connects to the host through this process's stdin and stdout.
    ///
    /// Anything else written to stdout would corrupt the command stream, so
    /// diagnostics must go to stderr.
    pub fn stdio() -> Self {
        Self::new(
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
    }
}
