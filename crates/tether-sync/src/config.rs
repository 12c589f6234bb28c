//! Session configuration

use std::time::Duration;

use serde::Deserialize;

/// Session configuration options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default log filter, used when `RUST_LOG` is unset
    pub log_level: String,

    /// Report shutdown when the last connection closes
    pub auto_shutdown: bool,

    /// How long a removal waits for the browser (milliseconds)
    pub remove_ack_timeout_ms: u64,

    /// Document title
    pub title: String,
}

impl Config {
    pub fn remove_ack_timeout(&self) -> Duration {
        Duration::from_millis(self.remove_ack_timeout_ms)
    }

    /// Load from a JSON object; missing fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            auto_shutdown: false,
            remove_ack_timeout_ms: 5000,
            title: "tether".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let config = Config::from_json(r#"{"auto_shutdown": true, "remove_ack_timeout_ms": 250}"#).unwrap();
        assert!(config.auto_shutdown);
        assert_eq!(config.remove_ack_timeout(), Duration::from_millis(250));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.title, "tether");
    }
}
