//! Board snapshot decoder.
//!
//! A snapshot arrives as one binary frame: the board's glyphs, one byte per
//! tile, raw-deflate compressed. Decoding happens in three steps:
//!
//! 1. **Inflate** the payload into a flat byte sequence.
//! 2. **Map** every byte to the character with the same code point.
//! 3. **Segment** the text into runs of identical glyphs, each tagged with a
//!    [`GlyphClass`] and its display color.
//!
//! Runs exist only so that a renderer can style a whole stretch of tiles at
//! once instead of one region per tile. They are lossless: concatenating the
//! text of every run gives back the inflated sequence, in order.
//!
//! ```text
//! "CCCFO111"  →  [C "CCC"] [F "F"] [O "O"] [1 "111"]
//! ```

use std::fmt;
use std::io::Read;

use flate2::read::DeflateDecoder;

use crate::ProtocolError;

/// Row separator the server appends after every board row.
pub const ROW_SEPARATOR: &str = "<br>";

/// Non-breaking space used by [`Run::display_text`] for blank glyphs.
pub const NBSP: char = '\u{a0}';

/// Fallback color for everything without a dedicated one.
pub const DEFAULT_COLOR: &str = "white";

// ---------------------------------------------------------------------------
// GlyphClass
// ---------------------------------------------------------------------------

/// What a board glyph means, derived from its character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphClass {
    /// `C`
    Closed,
    /// `F`
    Flagged,
    /// `O`: the mine that went off.
    Exploded,
    /// `#`, a space, or an already substituted non-breaking space.
    Blank,
    /// `1`–`8`: number of neighbouring mines.
    Number(u8),
    /// Anything else, including row separators.
    Other,
}

impl GlyphClass {
    /// Classifies a single character.
    pub fn of(c: char) -> Self {
        match c {
            'C' => Self::Closed,
            'F' => Self::Flagged,
            'O' => Self::Exploded,
            '#' | ' ' | NBSP => Self::Blank,
            '1'..='8' => Self::Number(c as u8 - b'0'),
            _ => Self::Other,
        }
    }

    /// Whether `c` belongs to the glyph alphabet that starts a new run.
    ///
    /// Characters outside it never open a run; they stick to whatever run
    /// precedes them.
    pub fn is_glyph(c: char) -> bool {
        !matches!(Self::of(c), Self::Other)
    }

    /// The color a run of this class is drawn in.
    pub fn color(self) -> &'static str {
        match self {
            Self::Exploded => "red",
            Self::Closed => "green",
            Self::Flagged => "yellow",
            Self::Number(1) => "#0100FB",
            Self::Number(2) => "#027F01",
            Self::Number(3) => "#FD0100",
            Self::Number(4) => "#01017B",
            Self::Number(5) => "#7D0302",
            Self::Number(6) => "#00807F",
            _ => DEFAULT_COLOR,
        }
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// A maximal stretch of board text drawn in one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Class of the run's first character.
    pub class: GlyphClass,
    /// Display color for the whole run.
    pub color: &'static str,
    /// The run's characters, exactly as decompressed.
    pub text: String,
}

impl Run {
    fn new(text: &str) -> Self {
        let class = text.chars().next().map_or(GlyphClass::Other, GlyphClass::of);
        Self {
            class,
            color: class.color(),
            text: text.to_owned(),
        }
    }

    /// The run's text with every space replaced by a non-breaking space,
    /// so that renderers which collapse whitespace keep blank tiles.
    pub fn display_text(&self) -> String {
        self.text.replace(' ', &NBSP.to_string())
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A decoded board snapshot: the ordered run sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    runs: Vec<Run>,
}

impl Board {
    /// Builds a board from already decompressed glyph text.
    pub fn from_text(text: &str) -> Self {
        Self { runs: segment(text) }
    }

    /// The runs in board order.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Number of runs (styled regions) a renderer has to draw.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Returns `true` if the snapshot was empty.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Reconstructs the decompressed text by concatenating every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Number of tiles, counting glyph characters only.
    pub fn tile_count(&self) -> usize {
        self.rows()
            .iter()
            .map(|row| row.chars().filter(|&c| GlyphClass::is_glyph(c)).count())
            .sum()
    }

    /// The board text split into rows on the server's row separator.
    pub fn rows(&self) -> Vec<String> {
        let text = self.text();
        let mut rows: Vec<String> = text.split(ROW_SEPARATOR).map(str::to_owned).collect();
        if rows.last().is_some_and(String::is_empty) {
            rows.pop();
        }
        rows
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Inflates a raw-deflate payload.
///
/// # Errors
/// Returns [`ProtocolError::Inflate`] if the payload is not valid deflate
/// data. Nothing tries to recover from this; the frame is lost.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let mut out = Vec::with_capacity(data.len() * 4);
    DeflateDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(ProtocolError::Inflate)?;
    Ok(out)
}

/// Decodes a binary snapshot frame into a [`Board`].
pub fn decode(data: &[u8]) -> Result<Board, ProtocolError> {
    let bytes = inflate(data)?;
    // One byte, one character: `u8 as char` keeps the code point.
    let text: String = bytes.iter().map(|&b| b as char).collect();
    let board = Board::from_text(&text);
    tracing::trace!(
        compressed = data.len(),
        inflated = bytes.len(),
        runs = board.run_count(),
        "board snapshot decoded"
    );
    Ok(board)
}

/// Splits board text into styled runs.
///
/// A new run starts at a character that differs from the one right before
/// it *and* is part of the glyph alphabet. Other characters (row
/// separators, unknown bytes) never start a run, so they end up at the tail
/// of the run before them. Empty input yields no runs.
pub fn segment(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut chars = text.char_indices();
    let Some((_, mut prev)) = chars.next() else {
        return runs;
    };

    let mut start = 0;
    for (idx, c) in chars {
        if c != prev && GlyphClass::is_glyph(c) {
            runs.push(Run::new(&text[start..idx]));
            start = idx;
        }
        prev = c;
    }
    runs.push(Run::new(&text[start..]));
    runs
}
