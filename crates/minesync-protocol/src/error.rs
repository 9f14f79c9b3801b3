//! Error types for the protocol layer.
//!
//! A `ProtocolError` always concerns exactly one frame. The session decides
//! what happens next: unknown commands are skipped, everything else is
//! reported as a failed frame and the socket keeps running.

/// Errors that can occur while turning a frame into a [`ServerMessage`](crate::ServerMessage).
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The JSON body of a `players` or `pos` command did not parse.
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The binary board snapshot is not valid deflate data.
    #[error("board snapshot did not inflate: {0}")]
    Inflate(#[source] std::io::Error),

    /// The command is known but its arguments are missing or malformed.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The first token of a text frame names no known command.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
}
