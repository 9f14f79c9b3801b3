//! Room model for the minesync client.
//!
//! Holds what the client knows about the single room it is bound to:
//! the board configuration from the handshake, the latest board snapshot,
//! where the sink drew that board, and a cursor for every participant.
//!
//! # Key types
//!
//! - [`Room`]: the room data model
//! - [`CursorRegistry`]: one [`Cursor`] per participant id
//! - [`BoardGeometry`]: page ↔ board ↔ tile coordinate transform
//! - [`CursorSurface`]: where cursor visuals are drawn

mod config;
mod cursor;
mod error;
mod geometry;
mod room;

pub use config::BoardConfig;
pub use cursor::{Cursor, CursorRegistry, CursorSurface};
pub use error::RoomError;
pub use geometry::{BoardGeometry, BoardPoint, BoardRect, Tile, TileRect};
pub use room::Room;
