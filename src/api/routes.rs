//! API route definitions

use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Json, Router,
};

use super::shared::SharedStateHandle;
use super::types::{AnalyzeFileResult, AnalyzeResponse, CommandAck};
use crate::error::EngineError;
use crate::protocol::DetectionStats;

/// Create the API router with all endpoints
pub fn create_router(state: SharedStateHandle) -> Router {
    Router::new()
        // Detection control
        .route("/api/start_detection", post(start_detection))
        .route("/api/stop_detection", post(stop_detection))
        // One-shot analysis
        .route("/api/upload_and_analyze", post(upload_and_analyze))
        // Counters
        .route("/api/stats", get(stats_handler))
        // WebSocket endpoint for realtime frame events
        .route("/ws", get(super::websocket::ws_handler))
        .with_state(state)
}

// ============================================================================
// Detection Control Handlers
// ============================================================================

async fn start_detection(State(state): State<SharedStateHandle>) -> Json<CommandAck> {
    match state.engine.start() {
        Ok(()) => Json(CommandAck::success("Detection started")),
        Err(EngineError::AlreadyActive) => Json(CommandAck::error("Detection already active")),
        Err(e) => Json(CommandAck::error(e.to_string())),
    }
}

async fn stop_detection(State(state): State<SharedStateHandle>) -> Json<CommandAck> {
    if !state.engine.stop() {
        log::debug!("stop requested while detection was not running");
    }
    Json(CommandAck::success("Detection stopped"))
}

async fn stats_handler(State(state): State<SharedStateHandle>) -> Json<DetectionStats> {
    Json(state.engine.stats())
}

// ============================================================================
// Upload Analysis Handler
// ============================================================================

async fn upload_and_analyze(
    State(state): State<SharedStateHandle>,
    mut multipart: Multipart,
) -> Json<AnalyzeResponse> {
    let detector = state.engine.detector();
    let mut saw_file = false;
    let mut results = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                log::warn!("malformed upload request: {}", e);
                break;
            }
        };
        if field.name() != Some("files") {
            continue;
        }
        saw_file = true;

        let filename = field.file_name().unwrap_or("unnamed").to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("failed to read upload {}: {}", filename, e);
                continue;
            }
        };

        // Files the detector cannot judge are skipped, not reported
        match detector.analyze(&bytes) {
            Ok(detection) => results.push(AnalyzeFileResult {
                filename,
                fire_detected: detection.fire_detected,
                confidence: detection.confidence,
            }),
            Err(e) => log::warn!("skipping {}: {}", filename, e),
        }
    }

    if !saw_file {
        return Json(AnalyzeResponse::error("No files uploaded"));
    }
    Json(AnalyzeResponse::success(results))
}
