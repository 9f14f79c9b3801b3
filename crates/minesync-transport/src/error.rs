/// Errors that can occur in the transport layer.
///
/// Every one of these is terminal for the session: the client never
/// reconnects, it only reports the failure in its status line.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The page URL cannot be turned into a socket endpoint.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Opening the WebSocket (TCP connect + upgrade) failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
