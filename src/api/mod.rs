//! REST API and realtime channel for the detection server
//!
//! HTTP endpoints control the engine; a WebSocket endpoint streams
//! frame events to connected clients.

pub mod routes;
pub mod server;
pub mod shared;
pub mod types;
pub mod websocket;

pub use server::{create_shared_state, run_server};
pub use shared::{SharedState, SharedStateHandle};
pub use types::{AnalyzeFileResult, AnalyzeResponse, CommandAck};
