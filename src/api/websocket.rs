//! WebSocket handler for realtime frame events
//!
//! Each connection at `/ws` subscribes to the broadcast channel and
//! receives every subsequent event in order. Nothing is sent on
//! connect; the first message is the next published frame.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::shared::SharedStateHandle;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedStateHandle>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: SharedStateHandle) {
    let client_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.subscribe();

    tracing::info!("websocket client {} connected", client_id);

    // The channel is push-only; inbound traffic is control frames plus
    // whatever stray text a client sends
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    tracing::debug!("websocket client sent: {}", text);
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("websocket receive error: {}", e);
                    break;
                }
            }
        }
    });

    // Forward broadcast events to this connection
    let send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("unserializable event: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(json)).await.is_err() {
                        break; // client disconnected
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("websocket client {} lagged, skipped {} events", client_id, n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Either task ending means the connection is done
    tokio::select! {
        _ = recv_task => {},
        _ = send_task => {},
    }

    tracing::info!("websocket client {} disconnected", client_id);
}
