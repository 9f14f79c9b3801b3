//! Coordinate transform between page, board and tile space.
//!
//! Three coordinate spaces are in play:
//!
//! - **page**: where the sink reports pointer events and draws cursors
//! - **board**: page coordinates relative to the board's top-left corner,
//!   floored to whole pixels; this is what `pos` frames carry
//! - **tile**: integer `(column, row)` on the board grid
//!
//! A [`BoardGeometry`] is a cached measurement of where the sink drew the
//! board. It is never authoritative: whenever the board is redrawn or the
//! viewport changes, measure again.

use minesync_protocol::BoardSize;

use crate::RoomError;

// ---------------------------------------------------------------------------
// Coordinate types
// ---------------------------------------------------------------------------

/// The board's on-screen rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A point in board pixels. May lie outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardPoint {
    pub x: i64,
    pub y: i64,
}

/// A tile index. May be out of range; check with [`BoardGeometry::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: i64,
    pub y: i64,
}

/// The page-space outline of one tile, used for the selection window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// ---------------------------------------------------------------------------
// BoardGeometry
// ---------------------------------------------------------------------------

/// Measured board placement plus the grid size it is divided into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    rect: BoardRect,
    size: BoardSize,
    tile_width: f64,
    tile_height: f64,
}

impl BoardGeometry {
    /// Builds a geometry from the sink's board rectangle.
    ///
    /// Tile pixel size is the rectangle divided evenly among the tiles.
    ///
    /// # Errors
    /// [`RoomError::InvalidGeometry`] if the rectangle has no area (the
    /// board has not been drawn yet).
    pub fn measure(rect: BoardRect, size: BoardSize) -> Result<Self, RoomError> {
        if !(rect.width > 0.0 && rect.height > 0.0) {
            return Err(RoomError::InvalidGeometry {
                width: rect.width,
                height: rect.height,
            });
        }

        Ok(Self {
            rect,
            size,
            tile_width: rect.width / f64::from(size.width),
            tile_height: rect.height / f64::from(size.height),
        })
    }

    pub fn rect(&self) -> BoardRect {
        self.rect
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Pixel width of one tile.
    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    /// Pixel height of one tile.
    pub fn tile_height(&self) -> f64 {
        self.tile_height
    }

    /// Page coordinates to board pixels, floored.
    pub fn page_to_board(&self, page_x: f64, page_y: f64) -> BoardPoint {
        BoardPoint {
            x: (page_x - self.rect.x).floor() as i64,
            y: (page_y - self.rect.y).floor() as i64,
        }
    }

    /// Board pixels back to page coordinates, where a cursor glyph is drawn.
    pub fn board_to_page(&self, point: BoardPoint) -> (f64, f64) {
        (self.rect.x + point.x as f64, self.rect.y + point.y as f64)
    }

    /// The tile that contains a board point.
    ///
    /// `floor(width * x / board_pixel_width)` per axis. Points left of or
    /// above the board yield negative indices.
    pub fn tile_of(&self, point: BoardPoint) -> Tile {
        Tile {
            x: (f64::from(self.size.width) * point.x as f64 / self.rect.width).floor() as i64,
            y: (f64::from(self.size.height) * point.y as f64 / self.rect.height).floor() as i64,
        }
    }

    /// Whether a tile index lies on the board.
    pub fn contains(&self, tile: Tile) -> bool {
        (0..i64::from(self.size.width)).contains(&tile.x)
            && (0..i64::from(self.size.height)).contains(&tile.y)
    }

    /// Page-space outline of the tile containing `point`, or `None` when
    /// that tile is off the board and the outline should be hidden.
    pub fn selection_rect(&self, point: BoardPoint) -> Option<TileRect> {
        let tile = self.tile_of(point);
        if !self.contains(tile) {
            return None;
        }
        Some(TileRect {
            x: self.rect.x + tile.x as f64 * self.tile_width,
            y: self.rect.y + tile.y as f64 * self.tile_height,
            width: self.tile_width,
            height: self.tile_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> BoardGeometry {
        // 30x16 board of 24px tiles drawn at (100, 50).
        BoardGeometry::measure(
            BoardRect { x: 100.0, y: 50.0, width: 720.0, height: 384.0 },
            BoardSize { width: 30, height: 16 },
        )
        .unwrap()
    }

    #[test]
    fn test_measure_derives_tile_size() {
        let g = geometry();
        assert_eq!(g.tile_width(), 24.0);
        assert_eq!(g.tile_height(), 24.0);
    }

    #[test]
    fn test_measure_rejects_empty_rect() {
        let size = BoardSize { width: 3, height: 3 };
        for (w, h) in [(0.0, 10.0), (10.0, 0.0), (-5.0, 10.0), (f64::NAN, 10.0)] {
            let rect = BoardRect { x: 0.0, y: 0.0, width: w, height: h };
            assert!(matches!(
                BoardGeometry::measure(rect, size),
                Err(RoomError::InvalidGeometry { .. })
            ));
        }
    }

    #[test]
    fn test_page_to_board_floors() {
        let g = geometry();
        assert_eq!(g.page_to_board(100.0, 50.0), BoardPoint { x: 0, y: 0 });
        assert_eq!(g.page_to_board(130.7, 74.2), BoardPoint { x: 30, y: 24 });
        assert_eq!(g.page_to_board(99.5, 49.9), BoardPoint { x: -1, y: -1 });
    }

    #[test]
    fn test_tile_of() {
        let g = geometry();
        assert_eq!(g.tile_of(BoardPoint { x: 0, y: 0 }), Tile { x: 0, y: 0 });
        assert_eq!(g.tile_of(BoardPoint { x: 23, y: 24 }), Tile { x: 0, y: 1 });
        assert_eq!(g.tile_of(BoardPoint { x: 719, y: 383 }), Tile { x: 29, y: 15 });
        assert_eq!(g.tile_of(BoardPoint { x: -1, y: 0 }), Tile { x: -1, y: 0 });
        assert_eq!(g.tile_of(BoardPoint { x: 720, y: 0 }), Tile { x: 30, y: 0 });
    }

    #[test]
    fn test_selection_rect_snaps_to_tile() {
        let g = geometry();
        let rect = g.selection_rect(BoardPoint { x: 50, y: 30 }).unwrap();
        assert_eq!(rect, TileRect { x: 148.0, y: 74.0, width: 24.0, height: 24.0 });
    }

    #[test]
    fn test_selection_rect_hidden_off_board() {
        let g = geometry();
        assert!(g.selection_rect(BoardPoint { x: -3, y: 10 }).is_none());
        assert!(g.selection_rect(BoardPoint { x: 10, y: 384 }).is_none());
    }

    #[test]
    fn test_board_to_page_inverts_page_to_board() {
        let g = geometry();
        let p = g.page_to_board(321.0, 87.0);
        assert_eq!(g.board_to_page(p), (321.0, 87.0));
    }
}
