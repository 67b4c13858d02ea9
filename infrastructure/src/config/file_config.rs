//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application types on demand.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use sleep_application::{BehaviorConfig, DEFAULT_TIME_FORMAT, DisplayConfig, DisplayTimezone};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("store.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("unknown store backend '{0}' (expected file or memory)")]
    UnknownBackend(String),

    #[error("display.time_format cannot be empty")]
    EmptyTimeFormat,

    #[error("display.time_format '{0}' is not a valid strftime layout")]
    InvalidTimeFormat(String),

    #[error("unknown display.timezone '{0}' (expected local or utc)")]
    UnknownTimezone(String),
}

/// Where nights are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// JSON file on disk
    #[default]
    File,
    /// Process memory; lost on exit
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(StoreBackend::File),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(ConfigValidationError::UnknownBackend(other.to_string())),
        }
    }
}

/// Raw store configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// Backend name (file, memory)
    pub backend: String,
    /// Path of the JSON store file; `~/` is expanded
    pub path: Option<String>,
    /// Timeout in seconds for a single store call
    pub timeout_seconds: Option<u64>,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            path: None,
            timeout_seconds: None,
        }
    }
}

impl FileStoreConfig {
    /// Parse backend string into StoreBackend
    pub fn parse_backend(&self) -> StoreBackend {
        self.backend.parse().unwrap_or_default()
    }

    /// Configured store path with `~/` expanded.
    pub fn expanded_path(&self) -> Option<PathBuf> {
        self.path.as_deref().map(expand_home)
    }
}

/// Raw display configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDisplayConfig {
    /// chrono strftime layout for history timestamps
    pub time_format: String,
    /// Timezone for history timestamps (local, utc)
    pub timezone: String,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileDisplayConfig {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            timezone: "local".to_string(),
            color: true,
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub store: FileStoreConfig,
    pub display: FileDisplayConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Timeout of 0 seconds doesn't make sense
        if let Some(0) = self.store.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        self.store.backend.parse::<StoreBackend>()?;

        let format = &self.display.time_format;
        if format.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTimeFormat);
        }
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigValidationError::InvalidTimeFormat(format.clone()));
        }

        self.display
            .timezone
            .parse::<DisplayTimezone>()
            .map_err(|_| ConfigValidationError::UnknownTimezone(self.display.timezone.clone()))?;

        Ok(())
    }

    pub fn behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig::from_timeout_seconds(self.store.timeout_seconds)
    }

    pub fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            time_format: self.display.time_format.clone(),
            timezone: self.display.timezone.parse().unwrap_or_default(),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
