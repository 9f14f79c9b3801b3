//! The session state machine.
//!
//! A [`Session`] is the client's single logical connection to its room. It
//! interprets every inbound frame, keeps the [`Room`] model current, drives
//! the render sink, and turns local input into [`ClientCommand`]s. It never
//! touches the socket itself: operations that want something sent return
//! the command, and the caller sends it.
//!
//! ```text
//!   Unregistered ──(open)──→ AwaitingHandshake ──(regack)──→ Active
//!                                                         ↑      │
//!                                     (next board frame)  │   (win / lose)
//!                                                         │      ↓
//!                                                        Won / Lost
//!
//!   any state ──(close)──→ Closed
//! ```
//!
//! Won and Lost only go back to Active when the server sends a fresh board.
//! Sending `reset` does not change the local state by itself.

use std::fmt;

use minesync_protocol::{
    Board, ClientCommand, Codec, PlayerEntry, PlayerId, PositionEntry, ProtocolError,
    ServerMessage,
};
use minesync_room::{BoardConfig, BoardPoint, Room, RoomError, Tile};
use minesync_transport::Frame;
use tracing::{debug, error, info, trace, warn};

use crate::{Identity, RenderSink, SessionError};

/// Status line after a win.
pub const WIN_STATUS: &str = "You win! Click here to play again.";

/// Status line once the server hung up.
pub const CLOSED_STATUS: &str = "Connection closed";

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, socket not open yet.
    Unregistered,
    /// `register` sent, waiting for `regack`.
    AwaitingHandshake,
    /// A game is running.
    Active,
    /// The board was cleared; waiting for a fresh board.
    Won,
    /// Somebody hit a mine; waiting for a fresh board.
    Lost,
    /// The transport is gone. Nothing leaves this state.
    Closed,
}

impl SessionState {
    /// Whether a reset is on offer.
    pub fn is_game_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unregistered => "Unregistered",
            Self::AwaitingHandshake => "AwaitingHandshake",
            Self::Active => "Active",
            Self::Won => "Won",
            Self::Lost => "Lost",
            Self::Closed => "Closed",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The client's one connection to its room.
#[derive(Debug)]
pub struct Session {
    identity: Identity,
    state: SessionState,
    room: Room,
    /// Most recent inbound frame, kept for diagnostics.
    last_frame: Option<Frame>,
    volume: f32,
}

impl Session {
    /// Creates an empty session for `identity`.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            state: SessionState::Unregistered,
            room: Room::new(),
            last_frame: None,
            volume: 1.0,
        }
    }

    /// Sets the explosion volume, clamped to `0.0..=1.0`.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = if volume.is_nan() { 1.0 } else { volume.clamp(0.0, 1.0) };
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    /// The local participant's id, known once `regack` arrived.
    pub fn local_id(&self) -> Option<PlayerId> {
        self.room.local_id()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    // -- Transport events ---------------------------------------------------

    /// The socket is open: returns the `register` command to send.
    pub fn on_open(&mut self) -> ClientCommand {
        if self.state != SessionState::Unregistered {
            warn!(state = %self.state, "socket opened twice");
        }
        self.state = SessionState::AwaitingHandshake;
        debug!(name = %self.identity.name(), "registering");
        ClientCommand::Register {
            name: self.identity.name().to_owned(),
            color: self.identity.color().to_owned(),
        }
    }

    /// Decodes and applies one inbound frame.
    ///
    /// Unknown commands are logged and skipped.
    ///
    /// # Errors
    /// - [`SessionError::Protocol`] if the frame cannot be decoded; the
    ///   frame is lost and the session is unchanged
    /// - [`SessionError::Closed`] after [`Session::on_close`]
    pub fn handle_frame<C, S>(&mut self, codec: &C, sink: &mut S, frame: Frame) -> Result<(), SessionError>
    where
        C: Codec + ?Sized,
        S: RenderSink + ?Sized,
    {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }

        let decoded = codec.decode(&frame);
        self.last_frame = Some(frame);

        match decoded {
            Ok(msg) => {
                self.handle_message(sink, msg);
                Ok(())
            }
            Err(ProtocolError::UnknownCommand(command)) => {
                debug!(%command, "ignoring unknown command");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Applies one already decoded message.
    pub fn handle_message<S>(&mut self, sink: &mut S, msg: ServerMessage)
    where
        S: RenderSink + ?Sized,
    {
        trace!(kind = msg.kind(), state = %self.state, "server message");

        match msg {
            ServerMessage::Regack {
                room,
                name,
                player_id,
                size,
                mine_ratio,
            } => self.on_regack(sink, room, name, player_id, BoardConfig::new(size, mine_ratio)),
            ServerMessage::Players(entries) => self.on_players(sink, entries),
            ServerMessage::Pos(entries) => self.on_positions(sink, entries),
            ServerMessage::Win => self.on_game_over(sink, SessionState::Won, WIN_STATUS),
            ServerMessage::Lose { who } => {
                self.on_game_over(sink, SessionState::Lost, &lose_status(&who));
                sink.play_explosion(self.volume);
            }
            ServerMessage::Logoff(id) => {
                let (_, cursors) = self.room.cursors_mut();
                if !cursors.remove(sink, id) {
                    debug!(%id, "logoff for unknown participant");
                }
            }
            ServerMessage::BoardSnapshot(board) => self.on_board(sink, board),
        }
    }

    /// Appends a transport error to the status line.
    pub fn on_transport_error<S, E>(&mut self, sink: &mut S, err: &E)
    where
        S: RenderSink + ?Sized,
        E: fmt::Display + ?Sized,
    {
        error!(error = %err, "connection error");
        sink.append_status(&format!("Connection error: {err}"));
    }

    /// The socket closed. Terminal.
    pub fn on_close<S>(&mut self, sink: &mut S)
    where
        S: RenderSink + ?Sized,
    {
        info!(previous = %self.state, "connection closed");
        self.state = SessionState::Closed;
        sink.set_reset_armed(false);
        sink.set_status(CLOSED_STATUS);
    }

    // -- Local input --------------------------------------------------------

    /// Moves the local cursor to follow the pointer.
    ///
    /// Returns the board-pixel position to announce, or `None` when there is
    /// nothing to announce yet (no handshake or no geometry).
    pub fn pointer_moved<S>(&mut self, sink: &mut S, page_x: f64, page_y: f64) -> Option<BoardPoint>
    where
        S: RenderSink + ?Sized,
    {
        if self.state == SessionState::Closed {
            return None;
        }
        let local = self.room.local_id()?;
        let (geometry, cursors) = self.room.cursors_mut();
        let geometry = geometry?;

        let point = geometry.page_to_board(page_x, page_y);
        if let Err(e) = cursors.move_to(sink, Some(geometry), local, point) {
            warn!(error = %e, "local cursor missing");
        }
        Some(point)
    }

    /// `reveal` for the tile under the pointer, if it is on the board.
    ///
    /// Narrower than the wire contract, which carries whatever tile a click
    /// maps to: clicks outside the board, or before the board has been
    /// measured, produce no command at all.
    pub fn reveal_at(&self, page_x: f64, page_y: f64) -> Option<ClientCommand> {
        let tile = self.tile_at(page_x, page_y)?;
        Some(ClientCommand::Reveal { x: tile.x, y: tile.y })
    }

    /// `flag` for the tile under the pointer, if it is on the board.
    ///
    /// Off-board clicks are filtered the same way as in
    /// [`reveal_at`](Self::reveal_at).
    pub fn flag_at(&self, page_x: f64, page_y: f64) -> Option<ClientCommand> {
        let tile = self.tile_at(page_x, page_y)?;
        Some(ClientCommand::Flag { x: tile.x, y: tile.y })
    }

    /// `reset`, but only while a win or loss is on screen.
    pub fn request_reset(&self) -> Option<ClientCommand> {
        self.state.is_game_over().then_some(ClientCommand::Reset)
    }

    /// The viewport changed: re-measure the board and re-place cursors.
    pub fn resized<S>(&mut self, sink: &mut S)
    where
        S: RenderSink + ?Sized,
    {
        self.remeasure(sink);
    }

    // -- Internals ----------------------------------------------------------

    fn on_regack<S>(&mut self, sink: &mut S, room: String, name: String, id: PlayerId, config: BoardConfig)
    where
        S: RenderSink + ?Sized,
    {
        self.room.configure(room, config, id);

        let (_, cursors) = self.room.cursors_mut();
        cursors.create(sink, id, name, self.identity.color());

        if matches!(self.state, SessionState::Unregistered | SessionState::AwaitingHandshake) {
            self.state = SessionState::Active;
        }
        self.remeasure(sink);
    }

    fn on_players<S>(&mut self, sink: &mut S, entries: Vec<PlayerEntry>)
    where
        S: RenderSink + ?Sized,
    {
        let (_, cursors) = self.room.cursors_mut();
        for PlayerEntry { id, name, color } in entries {
            cursors.create(sink, id, name, color);
        }
    }

    fn on_positions<S>(&mut self, sink: &mut S, entries: Vec<PositionEntry>)
    where
        S: RenderSink + ?Sized,
    {
        let local = self.room.local_id();
        let (geometry, cursors) = self.room.cursors_mut();

        for PositionEntry { id, x, y } in entries {
            if Some(id) == local {
                continue;
            }
            if let Err(e) = cursors.move_to(sink, geometry, id, BoardPoint { x, y }) {
                warn!(%id, error = %e, "position update incoherent, skipped");
            }
        }
    }

    fn on_game_over<S>(&mut self, sink: &mut S, state: SessionState, status: &str)
    where
        S: RenderSink + ?Sized,
    {
        info!(outcome = %state, "game over");
        self.state = state;
        sink.set_status(status);
        sink.set_reset_armed(true);
    }

    fn on_board<S>(&mut self, sink: &mut S, board: Board)
    where
        S: RenderSink + ?Sized,
    {
        self.room.replace_board(board);
        sink.render_board(self.room.board().runs());
        sink.set_reset_armed(false);

        match (self.room.name(), self.room.config()) {
            (Some(name), Some(config)) => sink.set_status(&running_status(name, config)),
            _ => debug!("board arrived before regack"),
        }

        if self.state.is_game_over() {
            info!("new game started");
            self.state = SessionState::Active;
        }
        self.remeasure(sink);
    }

    fn remeasure<S>(&mut self, sink: &mut S)
    where
        S: RenderSink + ?Sized,
    {
        let Some(rect) = sink.board_rect() else {
            return;
        };
        match self.room.measure(rect) {
            Ok(_) => {}
            Err(RoomError::NotConfigured) => return,
            Err(e) => {
                debug!(error = %e, "board not measurable");
                return;
            }
        }
        if let (Some(geometry), cursors) = self.room.cursors_mut() {
            cursors.redraw(sink, geometry);
        }
    }

    fn tile_at(&self, page_x: f64, page_y: f64) -> Option<Tile> {
        if self.state == SessionState::Closed {
            return None;
        }
        let Some(geometry) = self.room.geometry() else {
            debug!("click before the board was measured");
            return None;
        };
        let tile = geometry.tile_of(geometry.page_to_board(page_x, page_y));
        if !geometry.contains(tile) {
            debug!(x = tile.x, y = tile.y, "click outside the board");
            return None;
        }
        Some(tile)
    }
}

/// `<room> (<w>x<h>) >> Running, <ratio> tiles are mines`
fn running_status(room: &str, config: &BoardConfig) -> String {
    format!(
        "{room} ({}) >> Running, {} tiles are mines",
        config.size, config.mine_ratio
    )
}

fn lose_status(who: &str) -> String {
    format!("You lost, {who} was blown up. Click here to retry.")
}
