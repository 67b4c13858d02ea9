//! Application-level configuration.
//!
//! This module provides configuration types that control how the screen
//! controllers behave, such as store timeouts and how history is rendered.

use std::str::FromStr;
use std::time::Duration;

/// Default timestamp layout for the history view (chrono strftime syntax).
pub const DEFAULT_TIME_FORMAT: &str = "%A %b-%d-%Y Time: %H:%M";

/// Application behavior configuration.
///
/// Controls runtime behavior of the controllers, like the time limit for a
/// single store call.
#[derive(Debug, Clone, Default)]
pub struct BehaviorConfig {
    /// Maximum time to wait for a store call before treating it as failed.
    pub store_timeout: Option<Duration>,
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            store_timeout: seconds.map(Duration::from_secs),
        }
    }
}

/// Timezone used when rendering timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayTimezone {
    #[default]
    Local,
    Utc,
}

impl FromStr for DisplayTimezone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(DisplayTimezone::Local),
            "utc" => Ok(DisplayTimezone::Utc),
            other => Err(format!("unknown timezone '{}' (expected local or utc)", other)),
        }
    }
}

impl std::fmt::Display for DisplayTimezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayTimezone::Local => write!(f, "local"),
            DisplayTimezone::Utc => write!(f, "utc"),
        }
    }
}

/// How the sleep history is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// chrono strftime layout for start/end timestamps
    pub time_format: String,
    pub timezone: DisplayTimezone,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            timezone: DisplayTimezone::Local,
        }
    }
}

impl DisplayConfig {
    /// UTC rendering with the default layout.
    pub fn utc() -> Self {
        Self {
            timezone: DisplayTimezone::Utc,
            ..Self::default()
        }
    }

    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }
}
