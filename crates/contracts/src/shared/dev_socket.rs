use serde::{Deserialize, Serialize};

/// Live-reload WebSocket endpoint as seen by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketDescriptor {
    pub protocol: String,
    pub hostname: String,
    pub port: u16,
    pub pathname: String,
}

impl SocketDescriptor {
    /// Used when no backend URL is configured or it cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            protocol: "wss".to_string(),
            hostname: "localhost".to_string(),
            port: 443,
            pathname: "/ws".to_string(),
        }
    }

    pub fn to_url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.protocol, self.hostname, self.port, self.pathname
        )
    }
}

impl Default for SocketDescriptor {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Message pushed to the browser over the live-reload socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReloadMessage {
    Reload,
    BuildError { message: String },
}
