//! Transport abstraction layer for minesync.
//!
//! Provides the [`Connection`] trait that the client runtime drives, the
//! [`Frame`] type that distinguishes text commands from binary board
//! snapshots, and [`socket_url`] for deriving the room endpoint from the
//! room page address.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket client via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod endpoint;
mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use endpoint::{SOCKET_SUFFIX, socket_url};
pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::WebSocketConnection;

/// One message received from (or sent to) the room server.
///
/// The server mixes two payload kinds on the same socket: space-delimited
/// text commands and deflate-compressed board snapshots. Keeping them apart
/// at the transport boundary means the protocol layer never has to guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A UTF-8 text frame (`regack ...`, `pos [...]`, `win`, ...).
    Text(String),
    /// An opaque binary frame (compressed board snapshot).
    Binary(Vec<u8>),
}

impl Frame {
    /// Returns `true` for binary frames.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    /// Payload length in bytes, for logging.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(data) => data.len(),
        }
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The single socket a client holds for its whole lifetime.
///
/// Implemented by [`WebSocketConnection`] for real rooms and by scripted
/// in-memory connections in tests.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one text frame to the server.
    async fn send_text(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the next frame from the server.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Frame>, Self::Error>;
}
