//! Firewatch Server - Main Entry Point
//!
//! Serves the detection control API and the realtime frame channel.
//! Runs with the built-in still-frame source and the stand-in detector;
//! real deployments plug capture and inference in through the
//! `detection` traits.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;

use firewatch::api::{create_shared_state, run_server};
use firewatch::detection::{NullDetector, StillFrameSource};
use firewatch::settings::ServerSettings;
use firewatch::telemetry::{init_logging, LogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging(&LogConfig::default())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let settings = ServerSettings::load();
    let state = create_shared_state(
        Box::new(StillFrameSource::placeholder()),
        Arc::new(NullDetector),
        &settings,
    );

    let listener = TcpListener::bind(settings.bind_addr())
        .await
        .with_context(|| format!("could not bind {}", settings.bind_addr()))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    run_server(listener, state, shutdown_rx)
        .await
        .context("server error")?;
    Ok(())
}
