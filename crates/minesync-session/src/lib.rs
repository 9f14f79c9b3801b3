//! Session layer for the minesync client.
//!
//! This crate owns the protocol state machine of the client:
//!
//! 1. **Identity**: who we are ([`Identity`], persisted through an
//!    [`IdentityStore`])
//! 2. **Session**: the handshake and every inbound frame ([`Session`])
//! 3. **Rendering**: the capability interface the session draws through
//!    ([`RenderSink`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client runtime (above)  ← owns the socket, timers and input, feeds the session
//!     ↕
//! Session Layer (this crate)  ← interprets frames, produces commands
//!     ↕
//! Room / Protocol (below)  ← board model, cursors, wire types
//! ```

mod error;
mod identity;
mod session;
mod sink;

pub use error::SessionError;
pub use identity::{Identity, IdentityStore, Preferences, resolve_identity};
pub use session::{CLOSED_STATUS, Session, SessionState, WIN_STATUS};
pub use sink::RenderSink;
