//! # minesync
//!
//! Real-time client for shared multiplayer minesweeper rooms.
//!
//! A client holds one WebSocket to a room server, registers a name and a
//! color, renders the shared board as it changes, and keeps every
//! participant's cursor where its owner left it. Rendering is delegated to
//! a [`RenderSink`](minesync_session::RenderSink) the application provides.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use minesync::prelude::*;
//!
//! minesync::logging::init("info")?;
//! let identity = Identity::new("Alice", "#00ff00")?;
//! let page = Url::parse("http://localhost:8080/room/GameRoom")?;
//!
//! let mut client = Client::connect(&page, identity, my_sink, ClientConfig::default()).await?;
//! let input = client.input();
//! // feed input.pointer_moved(..), input.click(..) from your event source
//! client.run().await?;
//! ```

mod client;
mod config;
mod error;
mod input;
pub mod logging;
mod prefs;

pub use client::Client;
pub use config::ClientConfig;
pub use error::MinesyncError;
pub use input::{InputEvent, InputHandle};
pub use prefs::PreferencesFile;

pub use minesync_protocol as protocol;
pub use minesync_room as room;
pub use minesync_session as session;
pub use minesync_tick as tick;
pub use minesync_transport as transport;

/// The types an application needs to embed a client.
pub mod prelude {
    pub use crate::{Client, ClientConfig, InputEvent, InputHandle, MinesyncError, PreferencesFile};
    pub use minesync_protocol::{GlyphClass, PlayerId, Run};
    pub use minesync_room::{BoardRect, Cursor, CursorSurface, TileRect};
    pub use minesync_session::{
        Identity, IdentityStore, Preferences, RenderSink, SessionState, resolve_identity,
    };
    pub use url::Url;
}
