//! The client's view of the one room it is bound to.

use minesync_protocol::{Board, BoardSize, PlayerId};
use tracing::{debug, info};

use crate::{BoardConfig, BoardGeometry, BoardRect, CursorRegistry, RoomError};

/// Everything the client knows about its room.
///
/// Starts empty and fills in as frames arrive: `regack` sets the name and
/// board configuration, snapshots replace the board, and the cursor
/// registry follows the roster.
#[derive(Debug, Default)]
pub struct Room {
    name: Option<String>,
    config: Option<BoardConfig>,
    board: Board,
    geometry: Option<BoardGeometry>,
    cursors: CursorRegistry,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the handshake: room name, board configuration, local id.
    ///
    /// A second `regack` (the server may send one after a reset) overwrites
    /// the configuration and drops the now stale geometry.
    pub fn configure(&mut self, name: impl Into<String>, config: BoardConfig, local: PlayerId) {
        let name = name.into();
        info!(room = %name, board = %config, local = %local, "room configured");
        if self.config.as_ref().is_some_and(|c| c.size != config.size) {
            self.geometry = None;
        }
        self.name = Some(name);
        self.config = Some(config);
        self.cursors.set_local(local);
    }

    /// Room name from the handshake.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn config(&self) -> Option<&BoardConfig> {
        self.config.as_ref()
    }

    pub fn size(&self) -> Option<BoardSize> {
        self.config.as_ref().map(|c| c.size)
    }

    pub fn local_id(&self) -> Option<PlayerId> {
        self.cursors.local_id()
    }

    /// The most recent board snapshot.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replaces the board with a newer snapshot.
    pub fn replace_board(&mut self, board: Board) {
        debug!(runs = board.run_count(), "board replaced");
        self.board = board;
    }

    /// Re-measures the board from the sink's rectangle.
    ///
    /// # Errors
    /// - [`RoomError::NotConfigured`] before the handshake
    /// - [`RoomError::InvalidGeometry`] if the rectangle has no area
    ///
    /// On error the previous geometry is kept.
    pub fn measure(&mut self, rect: BoardRect) -> Result<&BoardGeometry, RoomError> {
        let size = self.size().ok_or(RoomError::NotConfigured)?;
        let geometry = BoardGeometry::measure(rect, size)?;
        Ok(self.geometry.insert(geometry))
    }

    /// Last successful measurement, if any.
    pub fn geometry(&self) -> Option<&BoardGeometry> {
        self.geometry.as_ref()
    }

    pub fn cursors(&self) -> &CursorRegistry {
        &self.cursors
    }

    /// Geometry and registry together, for cursor moves that need both.
    pub fn cursors_mut(&mut self) -> (Option<&BoardGeometry>, &mut CursorRegistry) {
        (self.geometry.as_ref(), &mut self.cursors)
    }
}
