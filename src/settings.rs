//! Runtime configuration for the server and monitor binaries
//!
//! Defaults, then an optional JSON file named by `FIREWATCH_CONFIG`,
//! then individual environment overrides, in that order.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Detection server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// TCP port for the HTTP/WebSocket listener
    #[serde(default = "default_port")]
    pub port: u16,
    /// Pause between pushed frames, in milliseconds
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Broadcast ring capacity for realtime events
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_port() -> u16 {
    5000
}

fn default_frame_interval_ms() -> u64 {
    100
}

fn default_event_capacity() -> usize {
    64
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            frame_interval_ms: default_frame_interval_ms(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl ServerSettings {
    /// Load settings from the environment
    ///
    /// Unreadable files and unparsable overrides are logged and ignored
    /// rather than failing startup.
    pub fn load() -> Self {
        let mut settings = match std::env::var("FIREWATCH_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path)).unwrap_or_else(|e| {
                log::warn!("ignoring config file {}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        if let Some(port) = env_parse("FIREWATCH_PORT") {
            settings.port = port;
        }
        if let Some(interval) = env_parse("FIREWATCH_FRAME_INTERVAL_MS") {
            settings.frame_interval_ms = interval;
        }
        settings
    }

    /// Parse settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Address the server binds
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Display client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Base URL of the detection server
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
        }
    }
}

impl MonitorSettings {
    /// Load settings from the environment (`FIREWATCH_SERVER`)
    pub fn load() -> Self {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var("FIREWATCH_SERVER") {
            if !url.is_empty() {
                settings.server_url = url;
            }
        }
        settings
    }

    /// Realtime channel URL derived from the server base URL
    pub fn ws_url(&self) -> String {
        let base = self.server_url.trim_end_matches('/');
        let ws = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else if base.contains("://") {
            base.to_string()
        } else {
            format!("ws://{base}")
        };
        format!("{ws}/ws")
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("ignoring invalid {}: {:?}", name, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn server_defaults() {
        let settings = ServerSettings::default();
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.frame_interval_ms, 100);
        assert_eq!(settings.event_capacity, 64);
        assert_eq!(settings.bind_addr().port(), 5000);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 8080}}"#).unwrap();

        let settings = ServerSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.frame_interval_ms, 100);
    }

    #[test]
    fn ws_url_derivation() {
        let http = MonitorSettings {
            server_url: "http://127.0.0.1:5000".to_string(),
        };
        assert_eq!(http.ws_url(), "ws://127.0.0.1:5000/ws");

        let https = MonitorSettings {
            server_url: "https://fires.example.com/".to_string(),
        };
        assert_eq!(https.ws_url(), "wss://fires.example.com/ws");

        let bare = MonitorSettings {
            server_url: "127.0.0.1:5000".to_string(),
        };
        assert_eq!(bare.ws_url(), "ws://127.0.0.1:5000/ws");
    }
}
