//! Transport abstraction layer for Slither.
//!
//! Provides the [`Connection`] trait: a line-framed, bidirectional channel to
//! the host. The turn loop only ever talks to a `Connection`, so production
//! code runs over stdin/stdout while tests run over in-memory buffers.
//!
//! # Feature Flags
//!
//! - `stdio` (default): [`StdioConnection`] over the process's own streams

#![allow(async_fn_in_trait)]

mod error;
mod stream;

pub use error::TransportError;
#[cfg(feature = "stdio")]
pub use stream::StdioConnection;
pub use stream::StreamConnection;

/// A line-oriented connection to the host.
///
/// Lines are returned without their terminator. Every sent line is flushed
/// before `send_line` returns, so the host sees each command as soon as it
/// is written.
pub trait Connection {
    /// Receives the next line.
    ///
    /// Returns `Ok(None)` when the host closed the stream.
    async fn recv_line(&mut self) -> Result<Option<String>, TransportError>;

    /// Writes one line followed by `\n` and flushes it.
    async fn send_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Number of lines received so far.
    fn lines_received(&self) -> u64;

    /// Number of lines sent so far.
    fn lines_sent(&self) -> u64;
}
