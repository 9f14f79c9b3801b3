//! Cursor registry: one cursor per known participant.
//!
//! The registry owns the logical side of every cursor (identity and last
//! known position). The visual side lives in whatever implements
//! [`CursorSurface`]; the registry tells it when to spawn, move and drop
//! the two visuals each cursor has: the pointer glyph and the tile-sized
//! selection outline.
//!
//! Invariant: at most one cursor per id, and `len()` always equals the
//! number of successful `create` calls minus successful `remove` calls.

use std::collections::HashMap;

use minesync_protocol::PlayerId;
use tracing::{debug, trace};

use crate::{BoardGeometry, BoardPoint, RoomError, TileRect};

// ---------------------------------------------------------------------------
// CursorSurface
// ---------------------------------------------------------------------------

/// Where cursor visuals are drawn.
pub trait CursorSurface {
    /// Creates the glyph and selection outline for a new cursor.
    ///
    /// `cursor.tracks_pointer` is set for the local participant only.
    fn spawn_cursor(&mut self, cursor: &Cursor);

    /// Moves the cursor glyph to page coordinates.
    fn place_cursor(&mut self, id: PlayerId, page_x: f64, page_y: f64);

    /// Moves the selection outline, or hides it with `None`.
    fn place_selection(&mut self, id: PlayerId, outline: Option<TileRect>);

    /// Detaches both visuals.
    fn remove_cursor(&mut self, id: PlayerId);
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// One participant's pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    /// Last known position in board pixels. `None` until the first move.
    pub position: Option<BoardPoint>,
    /// Whether local pointer movement drives this cursor.
    pub tracks_pointer: bool,
}

// ---------------------------------------------------------------------------
// CursorRegistry
// ---------------------------------------------------------------------------

/// All cursors of the room, keyed by participant id.
#[derive(Debug, Default)]
pub struct CursorRegistry {
    cursors: HashMap<PlayerId, Cursor>,
    local: Option<PlayerId>,
}

impl CursorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records which id belongs to this client.
    ///
    /// Must happen before the local cursor is created, so that exactly that
    /// cursor gets pointer tracking.
    pub fn set_local(&mut self, id: PlayerId) {
        self.local = Some(id);
    }

    pub fn local_id(&self) -> Option<PlayerId> {
        self.local
    }

    /// Creates a cursor and spawns its visuals.
    ///
    /// Returns `false` without touching anything if `id` already has one.
    pub fn create<S>(
        &mut self,
        surface: &mut S,
        id: PlayerId,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> bool
    where
        S: CursorSurface + ?Sized,
    {
        if self.cursors.contains_key(&id) {
            trace!(%id, "cursor already present");
            return false;
        }

        let cursor = Cursor {
            id,
            name: name.into(),
            color: color.into(),
            position: None,
            tracks_pointer: self.local == Some(id),
        };
        debug!(%id, name = %cursor.name, local = cursor.tracks_pointer, "cursor created");
        surface.spawn_cursor(&cursor);
        self.cursors.insert(id, cursor);
        true
    }

    /// Moves a cursor to a board-pixel position.
    ///
    /// The position is always recorded. Visuals are only updated once a
    /// geometry is known; the selection outline snaps to the containing tile
    /// and is hidden when that tile is off the board.
    ///
    /// # Errors
    /// [`RoomError::UnknownCursor`] if `id` has no cursor. Nothing changes.
    pub fn move_to<S>(
        &mut self,
        surface: &mut S,
        geometry: Option<&BoardGeometry>,
        id: PlayerId,
        point: BoardPoint,
    ) -> Result<(), RoomError>
    where
        S: CursorSurface + ?Sized,
    {
        let cursor = self.cursors.get_mut(&id).ok_or(RoomError::UnknownCursor(id))?;
        cursor.position = Some(point);

        if let Some(geometry) = geometry {
            draw(surface, geometry, id, point);
        }
        Ok(())
    }

    /// Re-projects every positioned cursor through a new geometry.
    pub fn redraw<S>(&self, surface: &mut S, geometry: &BoardGeometry)
    where
        S: CursorSurface + ?Sized,
    {
        for cursor in self.cursors.values() {
            if let Some(point) = cursor.position {
                draw(surface, geometry, cursor.id, point);
            }
        }
    }

    /// Drops a cursor and its visuals. Removing an absent id is a no-op
    /// and returns `false`.
    pub fn remove<S>(&mut self, surface: &mut S, id: PlayerId) -> bool
    where
        S: CursorSurface + ?Sized,
    {
        if self.cursors.remove(&id).is_none() {
            trace!(%id, "remove of absent cursor");
            return false;
        }
        debug!(%id, "cursor removed");
        surface.remove_cursor(id);
        true
    }

    pub fn get(&self, id: PlayerId) -> Option<&Cursor> {
        self.cursors.get(&id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.cursors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Iterates over all cursors in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Cursor> {
        self.cursors.values()
    }
}

fn draw<S>(surface: &mut S, geometry: &BoardGeometry, id: PlayerId, point: BoardPoint)
where
    S: CursorSurface + ?Sized,
{
    let (page_x, page_y) = geometry.board_to_page(point);
    surface.place_cursor(id, page_x, page_y);
    surface.place_selection(id, geometry.selection_rect(point));
}
