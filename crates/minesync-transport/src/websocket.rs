//! WebSocket client connection using `tokio-tungstenite`.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::{Connection, Frame, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A client WebSocket connected to a room endpoint.
///
/// The stream is split so that a pending `recv` never blocks an outgoing
/// `send_text` (position updates go out while we wait for frames).
pub struct WebSocketConnection {
    endpoint: Url,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl WebSocketConnection {
    /// Opens a WebSocket to the given endpoint.
    ///
    /// Use [`socket_url`](crate::socket_url) to build the endpoint from a
    /// room page address.
    pub async fn connect(endpoint: &Url) -> Result<Self, TransportError> {
        let (ws, response) = tokio_tungstenite::connect_async(endpoint.as_str())
            .await
            .map_err(|e| {
                TransportError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;
        tracing::info!(
            %endpoint,
            status = %response.status(),
            "WebSocket connected"
        );

        let (sink, stream) = ws.split();
        Ok(Self {
            endpoint: endpoint.clone(),
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        })
    }

    /// The endpoint this connection was opened to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send_text(&self, text: &str) -> Result<(), Self::Error> {
        self.sink
            .lock()
            .await
            .send(Message::text(text.to_owned()))
            .await
            .map_err(|e| {
                TransportError::SendFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    e,
                ))
            })
    }

    async fn recv(&self) -> Result<Option<Frame>, Self::Error> {
        loop {
            let msg = self.stream.lock().await.next().await;
            match msg {
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(Frame::Binary(data.into())));
                }
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(Frame::Text(text.as_str().to_owned())));
                }
                Some(Ok(Message::Close(reason))) => {
                    tracing::debug!(endpoint = %self.endpoint, ?reason, "server closed the socket");
                    return Ok(None);
                }
                None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }
}
