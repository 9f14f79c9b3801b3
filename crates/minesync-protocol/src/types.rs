//! Core protocol types for the room wire format.
//!
//! Every text frame starts with a command token. Instead of passing the raw
//! token and its string fields around, the codec parses each frame into one
//! variant of [`ServerMessage`], and everything the client sends is built
//! from a [`ClientCommand`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;
use crate::board::Board;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The server-assigned numeric id of a participant.
///
/// Stable for the lifetime of that participant's connection. Serialized as a
/// plain number, which is how it appears inside `players` and `pos` arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(PlayerId)
            .map_err(|_| ProtocolError::InvalidMessage(format!("bad player id {s:?}")))
    }
}

// ---------------------------------------------------------------------------
// Board size
// ---------------------------------------------------------------------------

/// Board dimensions in tiles, written `WxH` on the wire (`30x16`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: u32,
    pub height: u32,
}

impl BoardSize {
    /// Number of tiles on the board.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for BoardSize {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ProtocolError::InvalidMessage(format!("bad board size {s:?}"));
        let (w, h) = s.split_once('x').ok_or_else(bad)?;
        let width = w.trim().parse::<u32>().map_err(|_| bad())?;
        let height = h.trim().parse::<u32>().map_err(|_| bad())?;
        if width == 0 || height == 0 {
            return Err(bad());
        }
        Ok(Self { width, height })
    }
}

// ---------------------------------------------------------------------------
// Roster and position entries
// ---------------------------------------------------------------------------

/// One participant announced by a `players` frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEntry {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
}

/// One participant's board-pixel position from a `pos` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionEntry {
    pub id: PlayerId,
    pub x: i64,
    pub y: i64,
}

/// Undoes the server's space escaping in names.
///
/// Names travel inside space-delimited frames, so the server replaces their
/// spaces with `&nbsp;`. Some paths omit the semicolon; both are accepted.
pub fn unescape_spaces(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&nbsp", " ")
}

// ---------------------------------------------------------------------------
// ServerMessage: everything the room can tell us
// ---------------------------------------------------------------------------

/// A frame received from the room server, parsed once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// `regack <room> <name> <uid> <WxH> <ratio>`: the handshake is done and
    /// the local player id is now known.
    Regack {
        room: String,
        name: String,
        player_id: PlayerId,
        size: BoardSize,
        /// Kept verbatim; it is only ever displayed.
        mine_ratio: String,
    },

    /// `players [[id,name,color],...]`: roster additions.
    Players(Vec<PlayerEntry>),

    /// `pos [[id,[x,y]],...]`: a batch of remote cursor positions.
    Pos(Vec<PositionEntry>),

    /// `win`: the board was cleared.
    Win,

    /// `lose <who>`: somebody hit a mine.
    Lose { who: String },

    /// `logoff <id>`: a participant left.
    Logoff(PlayerId),

    /// A binary frame: the full board, already inflated and segmented.
    BoardSnapshot(Board),
}

impl ServerMessage {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Regack { .. } => "regack",
            Self::Players(_) => "players",
            Self::Pos(_) => "pos",
            Self::Win => "win",
            Self::Lose { .. } => "lose",
            Self::Logoff(_) => "logoff",
            Self::BoardSnapshot(_) => "board",
        }
    }
}

// ---------------------------------------------------------------------------
// ClientCommand: everything we can tell the room
// ---------------------------------------------------------------------------

/// A command sent to the room server as a plain text frame.
///
/// None of these is acknowledged; their effects come back asynchronously
/// as [`ServerMessage`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Handshake request, sent once when the socket opens.
    Register { name: String, color: String },
    /// Local cursor position in board pixels.
    Pos { x: i64, y: i64 },
    /// Open the tile at the given tile coordinates.
    Reveal { x: i64, y: i64 },
    /// Toggle the flag on the given tile.
    Flag { x: i64, y: i64 },
    /// Ask for a fresh game after a win or a loss.
    Reset,
    /// Liveness ping.
    Heartbeat,
}

impl ClientCommand {
    /// The liveness token the server ignores.
    pub const HEARTBEAT_TOKEN: &'static str = "<3";
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register { name, color } => write!(f, "register {name} {color}"),
            Self::Pos { x, y } => write!(f, "pos {x} {y}"),
            Self::Reveal { x, y } => write!(f, "reveal {x} {y}"),
            Self::Flag { x, y } => write!(f, "flag {x} {y}"),
            Self::Reset => f.write_str("reset"),
            Self::Heartbeat => f.write_str(Self::HEARTBEAT_TOKEN),
        }
    }
}
