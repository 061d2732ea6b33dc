use plotarea_core::maps::MapOptions;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Path of the JSON config file.
pub const CONFIG_ENV: &str = "PLOTAREA_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub bind_addr: SocketAddr,
    /// Map client assets served under `/app`.
    pub static_dir: PathBuf,
    pub location_timeout_secs: u64,
    pub map_load_timeout_secs: u64,
    /// Served to the orchestrator as the remote configuration store.
    pub secrets: HashMap<String, String>,
    pub map: MapOptions,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: PathBuf::from("static"),
            location_timeout_secs: 30,
            map_load_timeout_secs: 30,
            secrets: HashMap::new(),
            map: MapOptions::default(),
        }
    }
}

impl BackendConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reads the file named by `PLOTAREA_CONFIG`, falling back to defaults.
    pub fn load() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV) else {
            info!("{} not set, using default config", CONFIG_ENV);
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                warn!("Ignoring config {}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location_timeout_secs)
    }

    pub fn map_load_timeout(&self) -> Duration {
        Duration::from_secs(self.map_load_timeout_secs)
    }
}
