//! Board configuration announced by the server.

use std::fmt;

use minesync_protocol::BoardSize;

// ---------------------------------------------------------------------------
// BoardConfig
// ---------------------------------------------------------------------------

/// What the `regack` handshake tells us about the board.
///
/// Tile pixel sizes are not part of this: they depend on how the sink lays
/// the board out and live in [`BoardGeometry`](crate::BoardGeometry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Board dimensions in tiles.
    pub size: BoardSize,
    /// Fraction of tiles that are mines, exactly as the server wrote it
    /// (`0.2`, `1/5`, ...). Only ever displayed.
    pub mine_ratio: String,
}

impl BoardConfig {
    pub fn new(size: BoardSize, mine_ratio: impl Into<String>) -> Self {
        Self {
            size,
            mine_ratio: mine_ratio.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }
}

impl fmt::Display for BoardConfig {
    /// `30x16, 0.2 mines`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} mines", self.size, self.mine_ratio)
    }
}
