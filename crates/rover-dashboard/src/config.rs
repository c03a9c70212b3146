//! Dashboard configuration loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the vehicle backend
    #[serde(default = "default_url")]
    pub url: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_ms: default_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout() -> u64 {
    2000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Interval of the telemetry delta poll in milliseconds
    #[serde(default = "default_delta_interval")]
    pub delta_interval_ms: u64,
    /// Interval of the full snapshot refresh in milliseconds
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            delta_interval_ms: default_delta_interval(),
            snapshot_interval_ms: default_snapshot_interval(),
        }
    }
}

impl PollConfig {
    pub fn delta_interval(&self) -> Duration {
        Duration::from_millis(self.delta_interval_ms.max(1))
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_millis(self.snapshot_interval_ms.max(1))
    }
}

fn default_delta_interval() -> u64 {
    100
}

fn default_snapshot_interval() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Distance at which a sensor bar is drawn full size
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,
    #[serde(default = "default_velocity_unit")]
    pub velocity_unit: String,
    #[serde(default = "default_distance_unit")]
    pub distance_unit: String,
    /// Seconds a notice stays on screen
    #[serde(default = "default_notice_secs")]
    pub notice_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_distance: default_max_distance(),
            velocity_unit: default_velocity_unit(),
            distance_unit: default_distance_unit(),
            notice_secs: default_notice_secs(),
        }
    }
}

fn default_max_distance() -> f64 {
    100.0
}

fn default_velocity_unit() -> String {
    "km/h".to_string()
}

fn default_distance_unit() -> String {
    "cm".to_string()
}

fn default_notice_secs() -> u64 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File holding persisted UI state (active navigation route)
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> String {
    "./rover-dashboard.json".to_string()
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    Ok(())
}
