//! Shared state between API handlers and the detection engine

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::detection::DetectionEngine;
use crate::protocol::WsEvent;

/// State handed to every API handler
pub struct SharedState {
    /// The capture/analyze/publish engine
    pub engine: DetectionEngine,
    /// Broadcast channel feeding WebSocket connections
    ws_tx: broadcast::Sender<WsEvent>,
}

impl SharedState {
    pub fn new(engine: DetectionEngine, ws_tx: broadcast::Sender<WsEvent>) -> Self {
        Self { engine, ws_tx }
    }

    /// Subscribe to realtime events
    pub fn subscribe(&self) -> broadcast::Receiver<WsEvent> {
        self.ws_tx.subscribe()
    }

    /// Broadcast an event to all connected clients
    pub fn broadcast(&self, event: WsEvent) {
        // Ignore send errors (no subscribers is fine)
        let _ = self.ws_tx.send(event);
    }
}

/// Type alias for the shared state handle used by API handlers
pub type SharedStateHandle = Arc<SharedState>;
