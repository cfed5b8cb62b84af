use crate::common::test_server::WS_PATH;

use chat_core::Message;

use axum_test::{TestServer, TestWebSocket, WsMessage};
use tokio::time::{Duration, timeout};

/// How long a test waits for a frame that should arrive
pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(2);

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
}

impl WsTestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let ws = server
            .get_websocket(WS_PATH)
            .await
            .into_websocket()
            .await;

        Self { ws }
    }

    /// Connect asking to resume after `since`
    pub async fn connect_since(server: &TestServer, since: u64) -> Self {
        let ws = server
            .get_websocket(WS_PATH)
            .add_query_param("since", since)
            .await
            .into_websocket()
            .await;

        Self { ws }
    }

    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    pub async fn send_binary(&mut self, data: Vec<u8>) {
        self.ws.send_message(WsMessage::Binary(data.into())).await;
    }

    /// Receive one chat message, panicking if none arrives in time
    pub async fn receive_chat(&mut self) -> Message {
        let text = timeout(RECEIVE_TIMEOUT, self.ws.receive_text())
            .await
            .expect("timed out waiting for a chat message");
        Message::from_json(&text).expect("server sent an invalid chat frame")
    }

    /// Receive `count` chat messages and return their bodies
    pub async fn receive_bodies(&mut self, count: usize) -> Vec<String> {
        let mut bodies = Vec::with_capacity(count);
        for _ in 0..count {
            bodies.push(self.receive_chat().await.body);
        }
        bodies
    }

    /// Next raw frame, `None` if nothing arrived within `wait`
    pub async fn receive_frame_within(&mut self, wait: Duration) -> Option<WsMessage> {
        timeout(wait, self.ws.receive_message()).await.ok()
    }

    /// Skip frames until a close frame arrives and return its code
    pub async fn receive_close_code(&mut self) -> u16 {
        loop {
            let frame = timeout(RECEIVE_TIMEOUT, self.ws.receive_message())
                .await
                .expect("timed out waiting for a close frame");
            if let WsMessage::Close(close) = frame {
                return close.map(|c| u16::from(c.code)).unwrap_or(1005);
            }
        }
    }

    pub async fn close(self) {
        self.ws.close().await;
    }
}
