//! Wire protocol shared by the detection server and the display client
//!
//! JSON message types for the realtime channel. The control surface
//! acknowledges commands with free-form JSON and is deliberately not
//! typed here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events pushed over the realtime channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WsEvent {
    /// One rendered frame plus the detection verdict for it
    #[serde(rename = "frame_update")]
    FrameUpdate(FrameUpdate),
    /// The capture source failed; no more frames will follow
    #[serde(rename = "detection_error")]
    DetectionError { message: String },
}

/// Payload of a `frame_update` event
///
/// `image` is a base64-encoded JPEG, opaque to everything but the final
/// presentation layer. All other fields are optional on the wire; a
/// missing flag decodes as "no fire".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameUpdate {
    pub image: String,
    #[serde(default)]
    pub fire_detected: bool,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub stats: DetectionStats,
}

/// Session counters carried on every frame event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionStats {
    pub total_frames: u64,
    pub fire_detected_frames: u64,
    pub alerts_sent: u64,
    /// RFC 3339 timestamp of the most recent detection
    pub last_detection: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_update_wire_shape() {
        let event = WsEvent::FrameUpdate(FrameUpdate {
            image: "AAAA".to_string(),
            fire_detected: true,
            confidence: 42.5,
            stats: DetectionStats::default(),
        });

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(json["type"], "frame_update");
        assert_eq!(json["data"]["image"], "AAAA");
        assert_eq!(json["data"]["fire_detected"], true);
        assert_eq!(json["data"]["stats"]["total_frames"], 0);
    }

    #[test]
    fn missing_flag_decodes_as_no_fire() {
        let update: FrameUpdate = serde_json::from_str(r#"{"image":"AAAA"}"#).unwrap();
        assert!(!update.fire_detected);
        assert_eq!(update.confidence, 0.0);
        assert_eq!(update.stats, DetectionStats::default());
    }

    #[test]
    fn detection_error_wire_shape() {
        let event = WsEvent::DetectionError {
            message: "Could not access capture source".to_string(),
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(json["type"], "detection_error");
        assert_eq!(json["data"]["message"], "Could not access capture source");
    }
}
