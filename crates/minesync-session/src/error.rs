//! Error types for the session layer.

use minesync_protocol::ProtocolError;

/// Errors raised by the session state machine and identity handling.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A name or color failed validation.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// No identity was supplied and none is stored. The caller has to
    /// collect one (registration form, CLI flags) before connecting.
    #[error("no identity known; register a name and color first")]
    IdentityMissing,

    /// The identity store failed to read or write.
    #[error("identity store: {0}")]
    Store(String),

    /// An inbound frame could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A frame arrived after the connection was reported closed.
    #[error("session is closed")]
    Closed,
}
