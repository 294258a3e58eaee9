//! Test fixtures shared by the integration tests.
#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use huddle_server::{
    Hub, HubConfig,
    infrastructure::repository::{InMemoryMessageStore, InMemoryRoomAccess},
    ui::AppState,
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

/// In-process server bound to an ephemeral port.
pub struct TestServer {
    addr: SocketAddr,
    pub hub: Hub,
    pub access: Arc<InMemoryRoomAccess>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(HubConfig::default(), InMemoryMessageStore::new()).await
    }

    pub async fn start_with(config: HubConfig, store: InMemoryMessageStore) -> Self {
        huddle_shared::logger::setup_logger(env!("CARGO_CRATE_NAME"), "debug");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let hub = Hub::new(Arc::new(store), config);
        let access = Arc::new(InMemoryRoomAccess::new());
        let state = AppState::new(hub.clone(), access.clone());

        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(huddle_server::serve(listener, state, async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            hub,
            access,
            shutdown: Some(tx),
            task: Some(task),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, room: &str, participant_id: &str, display_name: &str) -> String {
        format!(
            "ws://{}/api/pools/{room}/chat/ws?participant_id={participant_id}&display_name={display_name}",
            self.addr
        )
    }

    /// Trigger graceful shutdown and wait for the server to stop.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), task).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// A WebSocket chat client.
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Self {
        let (stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .expect("Failed to connect WebSocket");
        Self { stream }
    }

    pub async fn send_json(&mut self, value: serde_json::Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next JSON frame, failing after two seconds.
    pub async fn recv_json(&mut self) -> serde_json::Value {
        loop {
            let next = tokio::time::timeout(Duration::from_secs(2), self.stream.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Stream ended")
                .expect("WebSocket error");
            match next {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
                }
                Message::Ping(_) | Message::Pong(_) => continue,
                other => panic!("Unexpected frame: {other:?}"),
            }
        }
    }

    /// Body of the next frame.
    pub async fn recv_body(&mut self) -> String {
        self.recv_json().await["body"]
            .as_str()
            .expect("Frame has no body")
            .to_string()
    }

    /// Assert no text frame arrives within `wait`.
    pub async fn assert_silent(&mut self, wait: Duration) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(wait, self.stream.next()).await
        {
            panic!("Unexpected frame: {}", text.as_str());
        }
    }

    /// Wait for the server to close the stream.
    pub async fn expect_closed(&mut self) {
        let deadline = Duration::from_secs(2);
        let result = tokio::time::timeout(deadline, async {
            while let Some(frame) = self.stream.next().await {
                match frame {
                    Ok(Message::Close(_)) | Err(_) => return,
                    Ok(_) => continue,
                }
            }
        })
        .await;
        assert!(result.is_ok(), "Stream was not closed");
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Poll `check` until it holds, failing after two seconds.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}
