//! The render sink: the session's only view of the presentation layer.

use minesync_protocol::Run;
use minesync_room::{BoardRect, CursorSurface};

/// Capability interface the session draws through.
///
/// Implementations own every visual; the session never sees more than the
/// calls below. Cursor visuals come from the [`CursorSurface`] supertrait.
pub trait RenderSink: CursorSurface {
    /// Replaces the status line.
    fn set_status(&mut self, text: &str);

    /// Adds a line below the current status.
    fn append_status(&mut self, line: &str);

    /// Arms or disarms "click the status line to reset".
    fn set_reset_armed(&mut self, armed: bool);

    /// Replaces the board's visual content with a run sequence.
    fn render_board(&mut self, runs: &[Run]);

    /// Where the board currently is on screen, or `None` if it has not been
    /// drawn yet.
    fn board_rect(&self) -> Option<BoardRect>;

    /// Plays the explosion effect at `volume` (`0.0..=1.0`).
    fn play_explosion(&mut self, volume: f32);
}
