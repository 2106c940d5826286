use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::account::LockPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Lock-acquisition budget for transfers
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Lock-acquisition budget, in milliseconds
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_attempt_timeout_ms() -> u64 {
    50
}

fn default_backoff_ms() -> u64 {
    100
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl TransferConfig {
    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.attempt_timeout_ms),
            Duration::from_millis(self.backoff_ms),
        )
    }
}

impl AppConfig {
    /// Load `config/{env}.yaml`
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::from_file(format!("config/{}.yaml", env))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.transfer.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "transfer.max_attempts must be at least 1".into(),
            ));
        }
        if self.transfer.attempt_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "transfer.attempt_timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
