//! API request/response types
//!
//! These types are used for JSON serialization in API endpoints.

use serde::{Deserialize, Serialize};

/// Acknowledgement for a start/stop command
///
/// Every command is answered with HTTP 200 and an in-band status field;
/// clients treat the body as opaque JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandAck {
    pub status: String,
    pub message: String,
}

impl CommandAck {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Verdict for one uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeFileResult {
    pub filename: String,
    pub fire_detected: bool,
    pub confidence: f32,
}

/// Response for the one-shot upload analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<AnalyzeFileResult>,
}

impl AnalyzeResponse {
    pub fn success(results: Vec<AnalyzeFileResult>) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            results,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            results: Vec::new(),
        }
    }
}
