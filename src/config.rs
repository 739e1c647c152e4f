//! Game configuration loaded from TOML.

use crate::game::Difficulty;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for the game binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Base URL of the level provider service.
    #[serde(default = "default_provider_url")]
    provider_url: String,

    /// Difficulty requested at startup.
    #[serde(default)]
    difficulty: Difficulty,

    /// Timeout applied to each level request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_provider_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(provider_url = %config.provider_url, "Config loaded successfully");
        Ok(config)
    }

    /// Base URL of the level provider service.
    pub fn provider_url(&self) -> &str {
        &self.provider_url
    }

    /// Difficulty requested at startup.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Timeout applied to each level request.
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    /// Overrides the provider URL.
    pub fn set_provider_url(&mut self, url: String) {
        self.provider_url = url;
    }

    /// Overrides the startup difficulty.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            difficulty: Difficulty::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GameConfig;
    use crate::game::Difficulty;
    use std::io::Write;

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "difficulty = \"hard\"").expect("write config");

        let config = GameConfig::from_file(file.path()).expect("load config");
        assert_eq!(config.difficulty(), Difficulty::Hard);
        assert_eq!(config.provider_url(), "http://127.0.0.1:3000");
        assert_eq!(config.request_timeout().as_secs(), 10);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "difficulty = ").expect("write config");

        assert!(GameConfig::from_file(file.path()).is_err());
    }
}
