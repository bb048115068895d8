//! Start/stop command client
//!
//! Two one-shot POSTs against the detection server. The acknowledgement
//! is whatever JSON the server returns; it is logged once and handed
//! back untouched. There is no retry and no timeout beyond the
//! transport's own defaults.

use crate::error::ControlError;

/// HTTP client for the detection control endpoints
pub struct ControlClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ControlClient {
    /// Client for a server base URL, e.g. `http://127.0.0.1:5000`
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            agent: ureq::Agent::new(),
            base_url,
        }
    }

    /// Ask the server to start its detection loop
    pub fn start_detection(&self) -> Result<serde_json::Value, ControlError> {
        self.command("start_detection")
    }

    /// Ask the server to stop its detection loop
    pub fn stop_detection(&self) -> Result<serde_json::Value, ControlError> {
        self.command("stop_detection")
    }

    fn command(&self, name: &str) -> Result<serde_json::Value, ControlError> {
        let url = format!("{}/api/{}", self.base_url, name);
        let ack: serde_json::Value = self.agent.post(&url).call()?.into_json()?;
        log::info!("{} acknowledged: {}", name, ack);
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ControlClient::new("http://127.0.0.1:5000///");
        assert_eq!(client.base_url, "http://127.0.0.1:5000");
    }
}
