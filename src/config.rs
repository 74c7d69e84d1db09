//! Monitor Configuration
//!
//! Runtime settings loaded from TOML, replacing the constants that were
//! hardcoded across the original script variants (notably the two competing
//! poll intervals).
//!
//! ## Loading Order
//!
//! 1. `FRACBOARD_CONFIG` environment variable (path to TOML file)
//! 2. `fracboard.toml` in the current working directory
//! 3. Built-in defaults
//!
//! CLI flags override individual fields after loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default config file name looked up in the working directory.
const CONFIG_FILE: &str = "fracboard.toml";

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Path or URL of the well-data JSON document.
    pub data_source: String,

    /// Poll interval in seconds.
    pub poll_interval_secs: u64,

    /// HTTP server bind address.
    pub server_addr: String,

    /// Path of the JSON preferences file.
    pub preferences_file: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            data_source: "./data.json".to_string(),
            poll_interval_secs: 60,
            server_addr: "0.0.0.0:8080".to_string(),
            preferences_file: "./fracboard_prefs.json".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration following the documented order. Never fails —
    /// unreadable or invalid files are logged and fall back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("FRACBOARD_CONFIG") {
            return Self::load_from(&path);
        }
        if Path::new(CONFIG_FILE).exists() {
            return Self::load_from(CONFIG_FILE);
        }
        info!("No config file found — using built-in defaults");
        Self::default()
    }

    fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::from_toml(&text) {
                Ok(config) => {
                    info!(path, "Loaded configuration");
                    config
                }
                Err(error) => {
                    warn!(path, error = %error, "Invalid config file — using defaults");
                    Self::default()
                }
            },
            Err(error) => {
                warn!(path, error = %error, "Could not read config file — using defaults");
                Self::default()
            }
        }
    }

    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// True when the data source should be fetched over HTTP.
    pub fn is_http_source(&self) -> bool {
        self.data_source.starts_with("http://") || self.data_source.starts_with("https://")
    }
}
