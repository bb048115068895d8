//! Firewatch Monitor - Main Entry Point
//!
//! Headless display client: starts remote detection, subscribes to the
//! frame stream, narrates alert transitions into the log, and stops
//! detection again on ctrl-c.

use anyhow::Context;

use firewatch::monitor::{ControlClient, FrameSubscriber, PresentationSurface};
use firewatch::settings::MonitorSettings;
use firewatch::telemetry::{init_logging, LogConfig};

/// Surface that narrates updates into the log
#[derive(Default)]
struct ConsoleView {
    alert_visible: bool,
    frames: u64,
}

impl PresentationSurface for ConsoleView {
    fn set_image_source(&mut self, uri: &str) {
        self.frames += 1;
        tracing::debug!(frame = self.frames, source_len = uri.len(), "frame received");
    }

    fn set_alert_visible(&mut self, visible: bool) {
        if visible == self.alert_visible {
            return;
        }
        self.alert_visible = visible;
        if visible {
            tracing::warn!("FIRE DETECTED");
        } else {
            tracing::info!("alert cleared");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging(&LogConfig::default())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let settings = MonitorSettings::load();
    let ws_url = settings.ws_url();

    let control = ControlClient::new(settings.server_url.clone());
    // One-shot blocking call; the ack itself is logged by the client
    let control = tokio::task::spawn_blocking(move || {
        if let Err(e) = control.start_detection() {
            // No retry; detection may already be running server-side
            tracing::warn!("start command failed: {}", e);
        }
        control
    })
    .await?;

    let subscriber = FrameSubscriber::connect(&ws_url)
        .await
        .with_context(|| format!("could not subscribe to {ws_url}"))?;
    let subscription = subscriber.subscribe(ConsoleView::default());

    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for ctrl-c")?;
    tracing::info!("shutting down");

    subscription.cancel().await;
    if let Err(e) = tokio::task::spawn_blocking(move || control.stop_detection()).await? {
        tracing::warn!("stop command failed: {}", e);
    }
    Ok(())
}
