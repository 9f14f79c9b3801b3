//! Error types for the room layer.

use minesync_protocol::PlayerId;

/// Errors from cursor and geometry operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// A cursor operation named an id that has no cursor.
    ///
    /// Happens when a `pos` races a `logoff` for the same participant, or
    /// when a roster announcement was never seen. Callers log it and move on.
    #[error("no cursor for player {0}")]
    UnknownCursor(PlayerId),

    /// The sink reported a board rectangle without area.
    #[error("board rectangle {width}x{height} has no area")]
    InvalidGeometry { width: f64, height: f64 },

    /// The board dimensions are not known yet (no `regack` so far).
    #[error("board is not configured yet")]
    NotConfigured,
}
