// Certstream Transport - Websocket client for the certstream feed
//
// Runs in its own task and forwards raw text frames through a channel. On a
// dropped or failed connection it reports the error and reconnects after a
// fixed delay.

use crate::error::PipelineError;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Public certstream endpoint
pub const DEFAULT_STREAM_URL: &str = "wss://certstream.calidog.io/";

/// Delay before reconnecting after a transport failure
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Buffer between the socket reader and the ingestor
const CHANNEL_CAPACITY: usize = 10_000;

/// One item delivered by the transport
#[derive(Debug)]
pub enum TransportEvent {
    /// A raw JSON message
    Message(String),
    /// A connection level failure; the transport keeps going
    Error(PipelineError),
}

/// Certstream websocket client
#[derive(Debug, Clone)]
pub struct CertstreamClient {
    url: String,
    reconnect_delay: Duration,
}

impl CertstreamClient {
    pub fn new(url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
        }
    }

    /// Start streaming in a background task
    pub fn spawn(self, cancel: CancellationToken) -> mpsc::Receiver<TransportEvent> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(async move { self.stream(tx, cancel).await });
        rx
    }

    async fn stream(self, tx: mpsc::Sender<TransportEvent>, cancel: CancellationToken) {
        while !cancel.is_cancelled() {
            let result = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.read_connection(&tx) => result,
            };

            if let Err(e) = result {
                if tx.send(TransportEvent::Error(e)).await.is_err() {
                    break;
                }
            }

            if tx.is_closed() {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }

        debug!("Certstream transport stopped");
    }

    /// Read one connection until it ends. `Ok` means the receiver went away.
    async fn read_connection(
        &self,
        tx: &mpsc::Sender<TransportEvent>,
    ) -> Result<(), PipelineError> {
        let (mut socket, _) = connect_async(self.url.as_str()).await?;
        info!("Connected to certificate stream at {}", self.url);

        while let Some(frame) = socket.next().await {
            let text = match frame? {
                Message::Text(text) => text,
                Message::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Message::Close(_) => break,
                _ => continue,
            };

            if tx.send(TransportEvent::Message(text)).await.is_err() {
                return Ok(());
            }
        }

        Err(PipelineError::Transport {
            details: format!("connection to {} closed", self.url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::SinkExt;
    use tokio::net::TcpListener;

    /// Local websocket server that sends `messages` on every connection and hangs up
    async fn serve(messages: Vec<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let messages = messages.clone();
                tokio::spawn(async move {
                    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                    for msg in messages {
                        ws.send(Message::Text(msg.to_string())).await.unwrap();
                    }
                    let _ = ws.close(None).await;
                });
            }
        });

        format!("ws://{}", addr)
    }

    async fn recv(rx: &mut mpsc::Receiver<TransportEvent>) -> Option<TransportEvent> {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_forwards_messages_then_reports_close() {
        let url = serve(vec!["one", "two"]).await;
        let cancel = CancellationToken::new();
        let mut rx = CertstreamClient::new(url, Duration::from_secs(60)).spawn(cancel.clone());

        assert!(matches!(recv(&mut rx).await, Some(TransportEvent::Message(m)) if m == "one"));
        assert!(matches!(recv(&mut rx).await, Some(TransportEvent::Message(m)) if m == "two"));
        assert!(matches!(
            recv(&mut rx).await,
            Some(TransportEvent::Error(PipelineError::Transport { .. }))
        ));

        cancel.cancel();
        assert!(recv(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn test_reconnects_after_failure() {
        let url = serve(vec!["hello"]).await;
        let cancel = CancellationToken::new();
        let mut rx = CertstreamClient::new(url, Duration::from_millis(10)).spawn(cancel.clone());

        let mut greetings = 0;
        while greetings < 2 {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .unwrap()
                .unwrap();
            if matches!(event, TransportEvent::Message(ref m) if m == "hello") {
                greetings += 1;
            }
        }

        cancel.cancel();
    }

    #[tokio::test]
    async fn test_unreachable_server_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        drop(listener);

        let cancel = CancellationToken::new();
        let mut rx = CertstreamClient::new(url, Duration::from_secs(60)).spawn(cancel.clone());

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert!(matches!(event, Some(TransportEvent::Error(_))));
        cancel.cancel();
    }
}
