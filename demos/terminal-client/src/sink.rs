use std::collections::BTreeMap;
use std::io::Write;

use minesync::prelude::*;
use minesync::protocol::board::ROW_SEPARATOR;
use tracing::debug;

const RESET: &str = "\x1b[0m";

/// Draws the room on stdout.
///
/// One board tile is one character cell, so page coordinates are simply
/// column and row numbers.
#[derive(Default)]
pub struct TerminalSink {
    status: String,
    reset_armed: bool,
    /// Columns and rows of the last drawn board.
    drawn: Option<(usize, usize)>,
    cursors: BTreeMap<PlayerId, CursorMark>,
}

struct CursorMark {
    name: String,
    color: String,
    cell: Option<(i64, i64)>,
}

impl TerminalSink {
    fn print_status(&self) {
        let hint = if self.reset_armed { "  [type `reset` for a new game]" } else { "" };
        println!("== {}{hint}", self.status);
    }

    fn print_cursors(&self) {
        for (id, mark) in &self.cursors {
            let at = match mark.cell {
                Some((x, y)) => format!("at {x},{y}"),
                None => "not moved yet".to_string(),
            };
            println!("   {}{}{RESET} ({id}) {at}", ansi_fg(&mark.color), mark.name);
        }
    }
}

impl CursorSurface for TerminalSink {
    fn spawn_cursor(&mut self, cursor: &Cursor) {
        self.cursors.insert(
            cursor.id,
            CursorMark {
                name: cursor.name.clone(),
                color: cursor.color.clone(),
                cell: None,
            },
        );
        println!("+ {}{}{RESET} joined", ansi_fg(&cursor.color), cursor.name);
    }

    fn place_cursor(&mut self, id: PlayerId, page_x: f64, page_y: f64) {
        if let Some(mark) = self.cursors.get_mut(&id) {
            mark.cell = Some((page_x.floor() as i64, page_y.floor() as i64));
        }
    }

    fn place_selection(&mut self, _id: PlayerId, _outline: Option<TileRect>) {}

    fn remove_cursor(&mut self, id: PlayerId) {
        if let Some(mark) = self.cursors.remove(&id) {
            println!("- {} left", mark.name);
        }
    }
}

impl RenderSink for TerminalSink {
    fn set_status(&mut self, text: &str) {
        self.status = text.to_owned();
        self.print_status();
    }

    fn append_status(&mut self, line: &str) {
        if !self.status.is_empty() {
            self.status.push('\n');
        }
        self.status.push_str(line);
        self.print_status();
    }

    fn set_reset_armed(&mut self, armed: bool) {
        self.reset_armed = armed;
    }

    fn render_board(&mut self, runs: &[Run]) {
        let mut out = String::new();
        let (mut col, mut width, mut rows) = (0usize, 0usize, 0usize);

        out.push_str("   ");
        for run in runs {
            let color = ansi_fg(run.color);
            out.push_str(&color);
            let mut parts = run.text.split(ROW_SEPARATOR).peekable();
            while let Some(part) = parts.next() {
                out.push_str(part);
                col += part.chars().count();
                if parts.peek().is_some() {
                    width = width.max(col);
                    col = 0;
                    rows += 1;
                    out.push_str(RESET);
                    out.push_str("\n   ");
                    out.push_str(&color);
                }
            }
        }
        out.push_str(RESET);
        if col > 0 {
            width = width.max(col);
            rows += 1;
        }
        self.drawn = (width > 0 && rows > 0).then_some((width, rows));

        println!("{}", out.trim_end());
        self.print_cursors();
        if let Err(e) = std::io::stdout().flush() {
            debug!(error = %e, "stdout flush failed");
        }
    }

    fn board_rect(&self) -> Option<BoardRect> {
        self.drawn.map(|(width, rows)| BoardRect {
            x: 0.0,
            y: 0.0,
            width: width as f64,
            height: rows as f64,
        })
    }

    fn play_explosion(&mut self, volume: f32) {
        if volume > 0.0 {
            print!("\x07");
        }
        println!("** BOOM **");
    }
}

/// Truecolor foreground escape for a CSS color name or hex color.
///
/// Unknown colors render in the terminal's default.
pub fn ansi_fg(color: &str) -> String {
    match rgb(color) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m"),
        None => String::new(),
    }
}

fn rgb(color: &str) -> Option<(u8, u8, u8)> {
    if let Some(hex) = color.strip_prefix('#') {
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return match hex.len() {
            3 => Some((digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
            6 => Some((pair(0)?, pair(2)?, pair(4)?)),
            _ => None,
        };
    }
    let named = match color.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(named)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_named_colors() {
        assert_eq!(rgb("#0100FB"), Some((1, 0, 251)));
        assert_eq!(rgb("#f00"), Some((255, 0, 0)));
        assert_eq!(rgb("Yellow"), Some((255, 255, 0)));
        assert_eq!(rgb("#12345"), None);
        assert_eq!(ansi_fg("chartreuse-ish"), "");
    }

    #[test]
    fn test_board_rect_follows_drawn_board() {
        let mut sink = TerminalSink::default();
        assert!(sink.board_rect().is_none());

        let runs = minesync::protocol::board::segment("CCC<br>F12<br>");
        sink.render_board(&runs);

        assert_eq!(
            sink.board_rect(),
            Some(BoardRect { x: 0.0, y: 0.0, width: 3.0, height: 2.0 })
        );
    }
}
