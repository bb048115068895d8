//! Presentation seam for the display client
//!
//! The subscriber drives one of these per event: image source first,
//! then the alert indicator, unconditionally. The latest event always
//! wins; nothing is diffed or retained.

use std::sync::{Arc, RwLock};

use crate::protocol::FrameUpdate;

/// The visual surface updated per frame event
pub trait PresentationSurface {
    /// Point the image view at a new source (a `data:` URI here)
    fn set_image_source(&mut self, uri: &str);
    /// Show or hide the alert indicator
    fn set_alert_visible(&mut self, visible: bool);
}

/// Apply one frame event to a surface
pub fn render_update<S: PresentationSurface + ?Sized>(surface: &mut S, update: &FrameUpdate) {
    surface.set_image_source(&format!("data:image/jpeg;base64,{}", update.image));
    surface.set_alert_visible(update.fire_detected);
}

/// What a [`MonitorView`] currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Current image source, if any frame has arrived yet
    pub image_source: Option<String>,
    /// Alert indicator visibility
    pub alert_visible: bool,
}

/// Shareable in-memory surface
///
/// Clones share one underlying state: hand one clone to the subscriber
/// and poll another for snapshots.
#[derive(Debug, Clone, Default)]
pub struct MonitorView {
    state: Arc<RwLock<ViewState>>,
}

impl MonitorView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current view state
    pub fn snapshot(&self) -> ViewState {
        self.state.read().unwrap().clone()
    }
}

impl PresentationSurface for MonitorView {
    fn set_image_source(&mut self, uri: &str) {
        self.state.write().unwrap().image_source = Some(uri.to_string());
    }

    fn set_alert_visible(&mut self, visible: bool) {
        self.state.write().unwrap().alert_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::DetectionStats;

    fn update(image: &str, fire: bool) -> FrameUpdate {
        FrameUpdate {
            image: image.to_string(),
            fire_detected: fire,
            confidence: 0.0,
            stats: DetectionStats::default(),
        }
    }

    #[test]
    fn quiet_frame_renders_hidden_alert() {
        let mut view = MonitorView::new();
        render_update(&mut view, &update("AAAA", false));

        let snapshot = view.snapshot();
        assert_eq!(
            snapshot.image_source.as_deref(),
            Some("data:image/jpeg;base64,AAAA")
        );
        assert!(!snapshot.alert_visible);
    }

    #[test]
    fn fire_frame_replaces_image_and_shows_alert() {
        let mut view = MonitorView::new();
        render_update(&mut view, &update("AAAA", false));
        render_update(&mut view, &update("BBBB", true));

        let snapshot = view.snapshot();
        assert_eq!(
            snapshot.image_source.as_deref(),
            Some("data:image/jpeg;base64,BBBB")
        );
        assert!(snapshot.alert_visible);
    }

    #[test]
    fn last_event_wins() {
        let mut view = MonitorView::new();
        for i in 0..10 {
            render_update(&mut view, &update(&format!("frame{i}"), i % 2 == 0));
        }

        let snapshot = view.snapshot();
        assert_eq!(
            snapshot.image_source.as_deref(),
            Some("data:image/jpeg;base64,frame9")
        );
        assert!(!snapshot.alert_visible);
    }

    #[test]
    fn missing_flag_hides_alert() {
        let mut view = MonitorView::new();
        render_update(&mut view, &update("AAAA", true));

        // A frame with no verdict on the wire clears the alert
        let bare: FrameUpdate = serde_json::from_str(r#"{"image":"CCCC"}"#).unwrap();
        render_update(&mut view, &bare);

        let snapshot = view.snapshot();
        assert_eq!(
            snapshot.image_source.as_deref(),
            Some("data:image/jpeg;base64,CCCC")
        );
        assert!(!snapshot.alert_visible);
    }
}
