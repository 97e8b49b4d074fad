//! Configuration handling for the client binary.
//!
//! Reads an optional YAML config file, then lets environment variables
//! override individual fields, so deployments can point at a different
//! device bridge without editing files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Address of the device's serial-over-TCP bridge
    pub device_addr: String,
    /// Per-read timeout in humantime form ("2s", "500ms")
    pub read_timeout: String,
    /// Key handle used when the command line does not name one
    pub key_handle: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            device_addr: "127.0.0.1:5000".to_string(),
            read_timeout: "2s".to_string(),
            key_handle: 0x2000,
        }
    }
}

impl ClientConfig {
    /// The read timeout as a parsed duration
    pub fn read_timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.read_timeout)
            .with_context(|| format!("invalid read_timeout '{}'", self.read_timeout))
    }
}

/// Load configuration from an optional file, then apply environment
/// overrides (`HSM_DEVICE_ADDR`, `HSM_READ_TIMEOUT`, `HSM_KEY_HANDLE`).
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let config: ClientConfig = serde_yaml::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            info!("loaded configuration from {}", path.display());
            config
        }
        None => ClientConfig::default(),
    };

    if let Ok(addr) = std::env::var("HSM_DEVICE_ADDR") {
        config.device_addr = addr;
    }
    if let Ok(timeout) = std::env::var("HSM_READ_TIMEOUT") {
        config.read_timeout = timeout;
    }
    if let Ok(handle) = std::env::var("HSM_KEY_HANDLE") {
        match parse_key_handle(&handle) {
            Ok(handle) => config.key_handle = handle,
            Err(_) => warn!("ignoring unparseable HSM_KEY_HANDLE '{}'", handle),
        }
    }

    Ok(config)
}

/// Parse a key handle given as decimal or 0x-prefixed hex
pub fn parse_key_handle(s: &str) -> Result<u32> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.with_context(|| format!("invalid key handle '{s}'"))
}
