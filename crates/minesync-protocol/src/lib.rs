//! Wire protocol for minesync.
//!
//! The room server speaks a small space-delimited text protocol and, in
//! between, pushes deflate-compressed board snapshots as binary frames.
//! This crate turns both into typed values once, at the boundary:
//!
//! - **Types** ([`ServerMessage`], [`ClientCommand`], [`PlayerId`], ...):
//!   the closed set of messages that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`LineCodec`]): frame ⇄ message.
//! - **Board** ([`board`] module): inflating a snapshot and segmenting it
//!   into styled runs.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (Frame) → Protocol (ServerMessage) → Session (state machine)
//! ```

pub mod board;
mod codec;
mod error;
mod types;

pub use board::{Board, GlyphClass, Run};
pub use codec::{Codec, LineCodec};
pub use error::ProtocolError;
pub use types::{
    BoardSize, ClientCommand, PlayerEntry, PlayerId, PositionEntry, ServerMessage,
    unescape_spaces,
};
