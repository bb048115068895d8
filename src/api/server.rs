//! Axum server setup and startup

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use super::routes::create_router;
use super::shared::{SharedState, SharedStateHandle};
use crate::detection::{DetectionEngine, FireDetector, FrameSource};
use crate::settings::ServerSettings;

/// Build the broadcast channel and engine behind one shared handle
pub fn create_shared_state(
    source: Box<dyn FrameSource>,
    detector: Arc<dyn FireDetector>,
    settings: &ServerSettings,
) -> SharedStateHandle {
    let (ws_tx, _) = broadcast::channel(settings.event_capacity);
    let engine = DetectionEngine::new(
        source,
        detector,
        ws_tx.clone(),
        Duration::from_millis(settings.frame_interval_ms),
    );
    Arc::new(SharedState::new(engine, ws_tx))
}

/// Run the API server on an already-bound listener
///
/// This function is intended to be run on a tokio runtime. It blocks
/// until the shutdown signal flips, then stops the engine.
pub async fn run_server(
    listener: TcpListener,
    state: SharedStateHandle,
    mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
) -> Result<(), std::io::Error> {
    // Permissive CORS, same stance as the browser-facing deployment
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state.clone()).layer(cors);

    if let Ok(addr) = listener.local_addr() {
        log::info!("API server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Wait for shutdown signal
            let _ = shutdown_rx.changed().await;
            log::info!("API server shutting down gracefully");
        })
        .await?;

    state.engine.stop();
    Ok(())
}
