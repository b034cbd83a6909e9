//! Configuration module for Playlens
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - System configuration (/etc/playlens/config.toml)
//! - User configuration (~/.playlens/config.toml)
//! - Project configuration (./playlens.toml)
//! - An explicit `--config` file
//! - Environment variables
//!
//! Command-line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::explain::Mode;

/// Default bounded queue size between producer and explainer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default tracing level when neither config nor `RUST_LOG` say otherwise.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering settings
    pub output: OutputConfig,

    /// Event stream settings
    pub stream: StreamConfig,

    /// Diagnostic logging settings
    pub logging: LoggingConfig,
}

/// When to emit ANSI styling.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when writing to a terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl ColorChoice {
    /// Whether to style output on a sink that is (or is not) a terminal.
    pub fn resolve(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Stream the rendered output goes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Stdout,
    Stderr,
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Presentation mode
    pub mode: Mode,

    /// Color policy
    pub color: ColorChoice,

    /// Output stream
    pub target: Target,
}

/// Event stream settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Events buffered between producer and explainer before the producer waits
    pub queue_capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }

        let mut config = Config::default();
        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                config = config.merge_from_file(&path)?;
            }
        }

        // Apply environment variable overrides
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Get the list of configuration file paths to check, lowest precedence first
    pub fn get_config_paths(explicit_path: Option<&PathBuf>) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // System-wide config
        paths.push(PathBuf::from("/etc/playlens/config.toml"));

        // User config
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".playlens/config.toml"));
        }

        // Project config (current directory)
        paths.push(PathBuf::from("playlens.toml"));

        // Explicit path wins over everything found on disk
        if let Some(path) = explicit_path {
            paths.push(path.clone());
        }

        paths
    }

    /// Merge configuration from a file
    pub fn merge_from_file(&self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        // Determine format based on extension
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let file_config: Config = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };

        Ok(self.merge(file_config))
    }

    /// Merge another config into this one; `other` wins where it differs from the defaults
    pub fn merge(&self, other: Config) -> Config {
        let defaults = Config::default();
        Config {
            output: OutputConfig {
                mode: if other.output.mode != defaults.output.mode {
                    other.output.mode
                } else {
                    self.output.mode
                },
                color: if other.output.color != defaults.output.color {
                    other.output.color
                } else {
                    self.output.color
                },
                target: if other.output.target != defaults.output.target {
                    other.output.target
                } else {
                    self.output.target
                },
            },
            stream: StreamConfig {
                queue_capacity: if other.stream.queue_capacity != defaults.stream.queue_capacity {
                    other.stream.queue_capacity
                } else {
                    self.stream.queue_capacity
                },
            },
            logging: LoggingConfig {
                log_level: if other.logging.log_level != defaults.logging.log_level {
                    other.logging.log_level
                } else {
                    self.logging.log_level.clone()
                },
            },
        }
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // PLAYLENS_MODE
        if let Some(mode) = lookup("PLAYLENS_MODE") {
            match mode.parse() {
                Ok(mode) => self.output.mode = mode,
                Err(err) => tracing::warn!(error = %err, "ignoring PLAYLENS_MODE"),
            }
        }

        // PLAYLENS_QUEUE_CAPACITY
        if let Some(capacity) = lookup("PLAYLENS_QUEUE_CAPACITY") {
            match capacity.trim().parse() {
                Ok(n) => self.stream.queue_capacity = n,
                Err(_) => tracing::warn!(value = %capacity, "ignoring PLAYLENS_QUEUE_CAPACITY"),
            }
        }

        // PLAYLENS_LOG_LEVEL
        if let Some(level) = lookup("PLAYLENS_LOG_LEVEL") {
            self.logging.log_level = level;
        }

        // NO_COLOR
        if lookup("NO_COLOR").is_some() || lookup("PLAYLENS_NO_COLOR").is_some() {
            self.output.color = ColorChoice::Never;
        }
    }

    /// Reject values no run can use.
    pub fn validate(&self) -> Result<()> {
        if self.stream.queue_capacity == 0 {
            return Err(Error::Config(
                "stream.queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a specific file, without the standard locations or env overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::default().merge_from_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }
}
