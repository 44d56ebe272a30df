//! Unified error type for the Slither client.

use slither_protocol::ProtocolError;
use slither_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// `#[from]` on each variant lets `?` convert sub-crate errors
/// automatically, so the turn loop and the binary deal with one type.
#[derive(Debug, thiserror::Error)]
pub enum SlitherError {
    /// The host's stream couldn't be read or the reply couldn't be written.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A line didn't match the record it was supposed to be.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
