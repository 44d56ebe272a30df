/// Errors that can occur in the transport layer.
///
/// Both variants are fatal for the client: once a read or write fails there
/// is no way to know which line the host is on.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Reading from the host failed, including input that isn't UTF-8.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Writing or flushing a line failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),
}
