//! Game Configuration
//!
//! One `GameConfig` value loaded from a RON file at startup and passed
//! into the window conf and the scene - no module-level tunables. A
//! missing or malformed file falls back to the defaults (logged, not
//! fatal): the demo must come up even with a bare checkout.

use serde::{Deserialize, Serialize};

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_PATH: &str = "assets/config/emberfield.ron";

/// Error type for config loading.
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O error
    Io(String),
    /// RON parse error
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Window setup, read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            fullscreen: false,
        }
    }
}

/// Simulation tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Player movement speed, world units per second
    pub player_speed: f32,
    /// Per-neighbor ignition probability of a spread pass
    pub spread_chance: f32,
    /// How many wandering enemies to spawn
    pub enemy_count: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player_speed: 50.0,
            spread_chance: 0.3,
            enemy_count: 10,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub sim: SimConfig,
}

impl GameConfig {
    /// Load from a RON file.
    pub fn load(path: &str) -> Result<GameConfig, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    /// Load from a RON file, falling back to defaults on any failure.
    /// Runs before the window exists, so failures go to stderr.
    pub fn load_or_default(path: &str) -> GameConfig {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("config {}: {} (using defaults)", path, e);
                GameConfig::default()
            }
        }
    }
}
