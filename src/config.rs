//! Explorer configuration: defaults, optionally overridden by a JSON file,
//! then by command-line flags.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::noise_source::NoiseParams;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Terrain grid width in cells
    pub world_width: usize,
    /// Terrain grid height in cells
    pub world_height: usize,
    /// Number of rings a ping expands through
    pub ping_strength: usize,
    /// Delay between ping rings in milliseconds
    pub ping_interval_ms: u64,
    /// Redraw cadence of the explorer in milliseconds
    pub frame_ms: u64,
    pub noise: NoiseParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world_width: 256,
            world_height: 256,
            ping_strength: 15,
            ping_interval_ms: 50,
            frame_ms: 28,
            noise: NoiseParams::default(),
        }
    }
}

impl Config {
    /// Load a config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the explorer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "world size must be positive, got {}x{}",
                self.world_width, self.world_height
            )));
        }
        if self.world_width > i32::MAX as usize || self.world_height > i32::MAX as usize {
            return Err(ConfigError::Invalid("world size too large".to_string()));
        }
        if self.frame_ms == 0 {
            return Err(ConfigError::Invalid("frame_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

/// Errors that can occur while loading a config file.
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read
    Io(std::io::Error),
    /// File is not valid JSON for a config
    Parse(String),
    /// Parsed but unusable values
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
