//! Coordinator configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observer::DEFAULT_MOVE_INTERVAL_MS;
use crate::redraw::DEFAULT_REDRAW_INTERVAL_MS;
use crate::resizer::ResizeUnit;

#[cfg(target_arch = "wasm32")]
use web_time::Duration;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tuning for the resize coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Floor interval between size updates while dragging.
    pub move_interval_ms: u64,
    /// Floor interval between handle redraws.
    pub redraw_interval_ms: u64,
    /// Unit committed sizes are expressed in, unless a resizer overrides it.
    pub unit: ResizeUnit,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            move_interval_ms: DEFAULT_MOVE_INTERVAL_MS,
            redraw_interval_ms: DEFAULT_REDRAW_INTERVAL_MS,
            unit: ResizeUnit::default(),
        }
    }
}

impl ResizeConfig {
    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject intervals that would disable throttling.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.move_interval_ms == 0 {
            return Err(ConfigError::Invalid("move_interval_ms must be positive".into()));
        }
        if self.redraw_interval_ms == 0 {
            return Err(ConfigError::Invalid("redraw_interval_ms must be positive".into()));
        }
        Ok(())
    }

    /// Move throttle interval.
    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }

    /// Redraw throttle interval.
    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.redraw_interval_ms)
    }
}
