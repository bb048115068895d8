//! Firewatch Library
//!
//! Realtime fire-detection streaming: a detection server pushing one
//! `frame_update` event per analyzed frame over a WebSocket, plus a
//! display client that starts/stops detection over HTTP and renders the
//! stream into a presentation surface.

pub mod api;
pub mod detection;
pub mod error;
pub mod monitor;
pub mod protocol;
pub mod settings;
pub mod telemetry;

pub use api::{create_shared_state, run_server, SharedState, SharedStateHandle};
pub use detection::{Detection, DetectionEngine, FireDetector, FrameSource, NullDetector, StillFrameSource};
pub use monitor::{ControlClient, FrameSubscriber, MonitorView, PresentationSurface, Subscription};
pub use protocol::{DetectionStats, FrameUpdate, WsEvent};
