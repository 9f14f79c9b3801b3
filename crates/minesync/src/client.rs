//! The client runtime: one task joining socket, timers and input.
//!
//! [`Client::run`] is a single `tokio::select!` loop over four sources:
//!
//! - inbound frames, handed to the [`Session`]
//! - the position ticker, flushing the latest queued pointer position
//! - the heartbeat ticker, sending the liveness token
//! - local [`InputEvent`]s from any number of [`InputHandle`]s
//!
//! The session, the render sink and the queued position are owned by the
//! loop and never shared, so nothing needs a lock. Each iteration produces
//! at most one outbound command, sent before the next event is looked at.

use minesync_protocol::{ClientCommand, Codec, LineCodec};
use minesync_room::BoardPoint;
use minesync_session::{Identity, RenderSink, Session};
use minesync_tick::{LatestWins, TickConfig, TickScheduler};
use minesync_transport::{Connection, Frame, WebSocketConnection, socket_url};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use url::Url;

use crate::{ClientConfig, InputEvent, InputHandle, MinesyncError};

/// A connected client for one room.
pub struct Client<C, S, K = LineCodec> {
    conn: C,
    codec: K,
    session: Session,
    sink: S,
    config: ClientConfig,
    input: InputHandle,
    input_rx: mpsc::UnboundedReceiver<InputEvent>,
}

impl<S: RenderSink> Client<WebSocketConnection, S> {
    /// Opens the room socket for a room page address.
    ///
    /// The endpoint is the page address with its scheme switched to
    /// `ws`/`wss` and `/ws` appended to the path.
    ///
    /// # Errors
    /// [`MinesyncError::Transport`] if the address is unusable or the
    /// connection cannot be established. Nothing is retried.
    pub async fn connect(
        page: &Url,
        identity: Identity,
        sink: S,
        config: ClientConfig,
    ) -> Result<Self, MinesyncError> {
        let endpoint = socket_url(page)?;
        info!(%endpoint, name = %identity.name(), "connecting");
        let conn = WebSocketConnection::connect(&endpoint).await?;
        Ok(Self::with_connection(conn, identity, sink, config))
    }
}

impl<C: Connection, S: RenderSink> Client<C, S> {
    /// Wraps an already open connection.
    pub fn with_connection(conn: C, identity: Identity, sink: S, config: ClientConfig) -> Self {
        let (input, input_rx) = InputHandle::channel();
        Self {
            conn,
            codec: LineCodec,
            session: Session::new(identity),
            sink,
            config: config.validated(),
            input,
            input_rx,
        }
    }
}

impl<C, S, K> Client<C, S, K>
where
    C: Connection,
    S: RenderSink,
    K: Codec,
{
    /// Sets the explosion volume.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.session = self.session.with_volume(volume);
        self
    }

    /// A handle for feeding local input into [`run`](Self::run).
    pub fn input(&self) -> InputHandle {
        self.input.clone()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Registers and then drives the session until the socket goes away.
    ///
    /// Frames that fail to decode are logged and dropped; the loop goes on.
    ///
    /// # Errors
    /// [`MinesyncError::Connection`] when receiving or sending fails. The
    /// error has already been shown on the sink's status line by then.
    /// A clean close from the server returns `Ok(())`.
    pub async fn run(&mut self) -> Result<(), MinesyncError> {
        let Self {
            conn,
            codec,
            session,
            sink,
            config,
            input_rx,
            ..
        } = self;

        let mut position_ticks = TickScheduler::with_period(config.position_interval());
        let mut heartbeat_ticks = TickScheduler::new(TickConfig {
            initial_jitter: config.heartbeat_jitter(),
            ..TickConfig::with_period(config.heartbeat_interval())
        });
        let mut pending: LatestWins<BoardPoint> = LatestWins::new();
        let mut input_open = true;

        let register = session.on_open();
        send_or_report(conn, codec, session, &mut *sink, &register).await?;

        loop {
            let outbound = tokio::select! {
                received = conn.recv() => match received {
                    Ok(Some(frame)) => {
                        let kind = if frame.is_binary() { "binary" } else { "text" };
                        if let Err(e) = session.handle_frame(&*codec, &mut *sink, frame) {
                            error!(error = %e, kind, "dropping frame");
                        }
                        None
                    }
                    Ok(None) => {
                        session.on_close(&mut *sink);
                        return Ok(());
                    }
                    Err(e) => {
                        session.on_transport_error(&mut *sink, &e);
                        return Err(MinesyncError::connection(e));
                    }
                },
                _ = position_ticks.wait_for_tick() => pending
                    .take()
                    .map(|point| ClientCommand::Pos { x: point.x, y: point.y }),
                _ = heartbeat_ticks.wait_for_tick() => Some(ClientCommand::Heartbeat),
                event = input_rx.recv(), if input_open => match event {
                    Some(event) => apply_input(session, &mut *sink, &mut pending, event),
                    None => {
                        debug!("all input handles dropped");
                        input_open = false;
                        None
                    }
                },
            };

            if let Some(command) = outbound {
                send_or_report(conn, codec, session, &mut *sink, &command).await?;
            }
        }
    }
}

/// Routes one input event through the session.
///
/// Pointer movement only queues a position; the ticker sends it.
fn apply_input<S>(
    session: &mut Session,
    sink: &mut S,
    pending: &mut LatestWins<BoardPoint>,
    event: InputEvent,
) -> Option<ClientCommand>
where
    S: RenderSink + ?Sized,
{
    match event {
        InputEvent::PointerMoved { page_x, page_y } => {
            if let Some(point) = session.pointer_moved(sink, page_x, page_y) {
                pending.push(point);
            }
            None
        }
        InputEvent::Click { page_x, page_y } => session.reveal_at(page_x, page_y),
        InputEvent::ContextClick { page_x, page_y } => session.flag_at(page_x, page_y),
        InputEvent::ResetClicked => session.request_reset(),
        InputEvent::Resized => {
            session.resized(sink);
            None
        }
    }
}

/// Encodes and sends one command. A failure is reported on the status line
/// before it is returned.
async fn send_or_report<C, K, S>(
    conn: &C,
    codec: &K,
    session: &mut Session,
    sink: &mut S,
    command: &ClientCommand,
) -> Result<(), MinesyncError>
where
    C: Connection,
    K: Codec,
    S: RenderSink + ?Sized,
{
    let text = match codec.encode(command) {
        Frame::Text(text) => text,
        Frame::Binary(_) => {
            error!(?command, "codec produced a binary command frame");
            return Ok(());
        }
    };

    debug!(command = %text, "sending");
    if let Err(e) = conn.send_text(&text).await {
        session.on_transport_error(sink, &e);
        return Err(MinesyncError::connection(e));
    }
    Ok(())
}
