//! Configuration for the finchat bot

use crate::error::{FinChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the dataset, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "data/financial_data.csv";

/// Environment variable overriding the dataset path
pub const DATA_PATH_ENV: &str = "FINCHAT_DATA";

/// Environment variable pointing at a metric vocabulary file
pub const METRICS_PATH_ENV: &str = "FINCHAT_METRICS";

/// Configuration for the finchat bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinChatConfig {
    /// CSV file with the financial records
    pub data_path: PathBuf,

    /// JSON metric vocabulary; the built-in vocabulary is used when absent
    pub metrics_path: Option<PathBuf>,

    /// REPL prompt
    pub prompt: String,

    /// Maximum number of conversation turns kept
    pub max_history: usize,

    /// Whether `/history` shows timestamps
    pub show_timestamps: bool,
}

impl Default for FinChatConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            metrics_path: None,
            prompt: ">>> ".to_string(),
            max_history: 50,
            show_timestamps: false,
        }
    }
}

impl FinChatConfig {
    /// Create a new configuration builder
    pub fn builder() -> FinChatConfigBuilder {
        FinChatConfigBuilder::default()
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.data_path.as_os_str().is_empty() {
            return Err(FinChatError::ConfigError(
                "data_path must not be empty".to_string(),
            ));
        }

        if self.max_history == 0 {
            return Err(FinChatError::ConfigError(
                "max_history must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for FinChatConfig
#[derive(Debug, Default)]
pub struct FinChatConfigBuilder {
    data_path: Option<PathBuf>,
    metrics_path: Option<PathBuf>,
    prompt: Option<String>,
    max_history: Option<usize>,
    show_timestamps: Option<bool>,
}

impl FinChatConfigBuilder {
    /// Set the dataset path
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Set the metric vocabulary path
    pub fn metrics_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metrics_path = Some(path.into());
        self
    }

    /// Set the prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set max history
    pub fn max_history(mut self, max: usize) -> Self {
        self.max_history = Some(max);
        self
    }

    /// Set show timestamps
    pub fn show_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = Some(show);
        self
    }

    /// Fill paths not set yet from `FINCHAT_DATA` and `FINCHAT_METRICS`
    pub fn with_env(mut self) -> Self {
        if self.data_path.is_none() {
            if let Ok(path) = std::env::var(DATA_PATH_ENV) {
                self.data_path = Some(PathBuf::from(path));
            }
        }
        if self.metrics_path.is_none() {
            if let Ok(path) = std::env::var(METRICS_PATH_ENV) {
                self.metrics_path = Some(PathBuf::from(path));
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<FinChatConfig> {
        let defaults = FinChatConfig::default();

        let config = FinChatConfig {
            data_path: self.data_path.unwrap_or(defaults.data_path),
            metrics_path: self.metrics_path,
            prompt: self.prompt.unwrap_or(defaults.prompt),
            max_history: self.max_history.unwrap_or(defaults.max_history),
            show_timestamps: self.show_timestamps.unwrap_or(defaults.show_timestamps),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FinChatConfig::default();
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.prompt, ">>> ");
        assert_eq!(config.max_history, 50);
        assert!(config.metrics_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = FinChatConfig::builder()
            .data_path("/tmp/fin.csv")
            .metrics_path("/tmp/metrics.json")
            .prompt("$ ")
            .max_history(10)
            .show_timestamps(true)
            .build()
            .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/tmp/fin.csv"));
        assert_eq!(config.metrics_path, Some(PathBuf::from("/tmp/metrics.json")));
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.max_history, 10);
        assert!(config.show_timestamps);
    }

    #[test]
    fn test_validation() {
        assert!(FinChatConfig::builder().max_history(0).build().is_err());
        assert!(FinChatConfig::builder().data_path("").build().is_err());
    }

    #[test]
    fn test_explicit_paths_win_over_env() {
        let config = FinChatConfig::builder()
            .data_path("explicit.csv")
            .with_env()
            .build()
            .unwrap();
        assert_eq!(config.data_path, PathBuf::from("explicit.csv"));
    }
}
