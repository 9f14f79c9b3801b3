//! Integration tests for the WebSocket client connection.
//!
//! Each test spins up a bare `tokio-tungstenite` server on an
//! OS-assigned port and plays the room server's side by hand.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use minesync_transport::{Connection, Frame, WebSocketConnection, socket_url};
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;
    use url::Url;

    /// Binds a listener and returns it with the page URL a client would
    /// have been started for.
    async fn room_listener() -> (TcpListener, Url) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().unwrap();
        let page = Url::parse(&format!("http://{addr}/room/test")).unwrap();
        (listener, page)
    }

    #[tokio::test]
    async fn test_client_sends_text_and_receives_both_frame_kinds() {
        let (listener, page) = room_listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

            // First thing the client says.
            let msg = ws.next().await.unwrap().unwrap();
            assert_eq!(msg.into_text().unwrap().as_str(), "register alice #ff0000");

            ws.send(Message::text("regack R alice 1 2x2 1/5".to_owned()))
                .await
                .unwrap();
            ws.send(Message::Binary(vec![1u8, 2, 3].into())).await.unwrap();
            ws.close(None).await.unwrap();
        });

        let endpoint = socket_url(&page).unwrap();
        let conn = WebSocketConnection::connect(&endpoint)
            .await
            .expect("client should connect");
        assert_eq!(conn.endpoint().path(), "/room/test/ws");

        conn.send_text("register alice #ff0000").await.unwrap();

        let first = conn.recv().await.unwrap();
        assert_eq!(first, Some(Frame::Text("regack R alice 1 2x2 1/5".into())));

        let second = conn.recv().await.unwrap();
        assert_eq!(second, Some(Frame::Binary(vec![1, 2, 3])));

        let closed = conn.recv().await.expect("clean close is not an error");
        assert!(closed.is_none(), "should return None after server close");

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        let (listener, page) = room_listener().await;
        drop(listener);

        let endpoint = socket_url(&page).unwrap();
        let result = WebSocketConnection::connect(&endpoint).await;
        assert!(result.is_err(), "nothing is listening any more");
    }
}
