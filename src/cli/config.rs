//! Configuration management for agent-dispatch
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.agent/config.toml

use crate::benchmark::DEFAULT_BENCHMARK_PROMPT;
use crate::dispatch::DispatchSettings;
use crate::errors::{DispatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub executor: ExecutorConfig,
    pub selection: SelectionConfig,
    pub notify: NotifyConfig,
    pub paths: PathsConfig,
}

/// Tool execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Hard per-call timeout
    pub timeout_secs: u64,
}

/// Best-tool selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Successful runs newer than this are trusted without re-benchmarking
    pub freshness_minutes: i64,
    pub benchmark_prompt: String,
}

/// Desktop notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub enabled: bool,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub state_dir: String,
    pub registry_file: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { timeout_secs: 300 }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            freshness_minutes: 60,
            benchmark_prompt: DEFAULT_BENCHMARK_PROMPT.to_string(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: "~/.agent".to_string(),
            registry_file: "tools.json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load_default(),
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DispatchError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| DispatchError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from ~/.agent/config.toml if present, else built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".agent").join("config.toml");
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.executor.timeout_secs == 0 {
            return Err(DispatchError::ConfigError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.selection.freshness_minutes <= 0 {
            return Err(DispatchError::ConfigError(
                "freshness_minutes must be greater than 0".to_string(),
            ));
        }

        if self.selection.benchmark_prompt.trim().is_empty() {
            return Err(DispatchError::ConfigError(
                "benchmark_prompt cannot be empty".to_string(),
            ));
        }

        if self.paths.registry_file.trim().is_empty() {
            return Err(DispatchError::ConfigError(
                "registry_file cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| DispatchError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DispatchError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DispatchError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get state directory path
    pub fn state_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.state_dir)
    }

    /// Get registry file path
    pub fn registry_path(&self) -> PathBuf {
        self.state_dir().join(&self.paths.registry_file)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.executor.timeout_secs)
    }

    /// Selection settings for the dispatcher
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            freshness: chrono::Duration::minutes(self.selection.freshness_minutes),
            benchmark_prompt: self.selection.benchmark_prompt.clone(),
        }
    }
}
