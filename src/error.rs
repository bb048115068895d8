//! Error types for the control client, subscriber, and engine

use thiserror::Error;

/// Failures issuing a start/stop command
///
/// There is no retry or backoff anywhere in this path; the caller gets
/// the error and decides.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("command request failed: {0}")]
    Transport(#[from] Box<ureq::Error>),
    #[error("acknowledgement was not valid JSON: {0}")]
    InvalidAck(#[from] std::io::Error),
}

impl From<ureq::Error> for ControlError {
    fn from(err: ureq::Error) -> Self {
        ControlError::Transport(Box::new(err))
    }
}

/// Failures establishing the realtime channel
#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("websocket connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Failures inside the detection engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Detection already active")]
    AlreadyActive,
    #[error("capture source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("detector failure: {0}")]
    Detector(String),
}
