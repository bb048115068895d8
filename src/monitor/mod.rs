//! Display client: control commands, frame subscription, presentation

pub mod control;
pub mod presentation;
pub mod subscriber;

pub use control::ControlClient;
pub use presentation::{render_update, MonitorView, PresentationSurface, ViewState};
pub use subscriber::{FrameSubscriber, Subscription};
