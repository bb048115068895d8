//! Live frame subscription over the realtime channel
//!
//! One connection, one consumer, events applied strictly in arrival
//! order. There is no reconnect: when the transport drops, the
//! subscription ends and stays ended.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::presentation::{render_update, PresentationSurface};
use crate::error::SubscribeError;
use crate::protocol::WsEvent;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// A connected realtime channel, not yet consuming events
pub struct FrameSubscriber {
    stream: WsStream,
}

impl FrameSubscriber {
    /// Open the channel, e.g. `ws://127.0.0.1:5000/ws`
    pub async fn connect(url: &str) -> Result<Self, SubscribeError> {
        let (stream, _response) = connect_async(url).await?;
        tracing::info!("subscribed to {}", url);
        Ok(Self { stream })
    }

    /// Start consuming events into the given surface
    ///
    /// Events are handled one at a time by a single task; each frame
    /// overwrites whatever the surface showed before. The returned
    /// handle is the only way to stop delivery cleanly.
    pub fn subscribe<S>(self, mut surface: S) -> Subscription
    where
        S: PresentationSurface + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let (mut write, mut read) = self.stream.split();
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        let _ = write.send(Message::Close(None)).await;
                        break;
                    }
                    msg = read.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<WsEvent>(&text) {
                                Ok(WsEvent::FrameUpdate(update)) => {
                                    render_update(&mut surface, &update);
                                }
                                Ok(WsEvent::DetectionError { message }) => {
                                    tracing::warn!("server reported detection error: {}", message);
                                }
                                Err(e) => {
                                    tracing::warn!("discarding malformed event: {}", e);
                                }
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let _ = write.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            tracing::info!("realtime channel closed");
                            break;
                        }
                        Some(Err(e)) => {
                            tracing::warn!("realtime channel error: {}", e);
                            break;
                        }
                        Some(Ok(_)) => {}
                    }
                }
            }
        });
        Subscription {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Cancellation handle for a running subscription
pub struct Subscription {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Subscription {
    /// True once delivery has ended (disconnect or cancellation)
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Close the channel and wait for delivery to wind down
    pub async fn cancel(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Wait for the subscription to end on its own
    pub async fn join(self) {
        let _ = self.task.await;
    }
}
