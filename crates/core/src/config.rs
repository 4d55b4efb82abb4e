//! Application configuration.

use serde::{Deserialize, Serialize};

/// Smallest accepted threshold growth, in percent.
pub const MIN_GROWTH_PERCENT: u32 = 100;

/// Errors raised when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed JSON or wrong field types
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Thresholds must not shrink between levels
    #[error("threshold_growth_percent must be at least {MIN_GROWTH_PERCENT}, got {0}")]
    ShrinkingThreshold(u32),
}

/// Top-level configuration, loaded from an optional JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory for locally persisted data
    #[serde(default = "default_storage_path")]
    pub storage_path: std::path::PathBuf,

    /// Base URL of the StudyHub backend
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout for backend calls, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Progression engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_storage_path() -> std::path::PathBuf {
    ".studyhub".into()
}

fn default_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            engine: EngineConfig::default(),
        }
    }
}

/// Progression engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Credit an achievement's XP when it unlocks
    #[serde(default)]
    pub credit_achievement_xp: bool,

    /// Threshold growth per level, in percent (150 = x1.5)
    #[serde(default = "default_growth_percent")]
    pub threshold_growth_percent: u32,

    /// Upper bound for the streak bonus, in percent
    #[serde(default = "default_max_streak_bonus")]
    pub max_streak_bonus: u32,
}

fn default_growth_percent() -> u32 {
    150
}

fn default_max_streak_bonus() -> u32 {
    20
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            credit_achievement_xp: false,
            threshold_growth_percent: default_growth_percent(),
            max_streak_bonus: default_max_streak_bonus(),
        }
    }
}

impl EngineConfig {
    /// Check settings the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold_growth_percent < MIN_GROWTH_PERCENT {
            return Err(ConfigError::ShrinkingThreshold(self.threshold_growth_percent));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.engine.validate()?;
        Ok(config)
    }
}
