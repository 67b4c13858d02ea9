//! Configuration file loading for sleep-tracker
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./sleep-tracker.toml` or `./.sleep-tracker.toml`
//! 3. Environment variables prefixed `SLEEP_TRACKER_`
//! 4. XDG config: `$XDG_CONFIG_HOME/sleep-tracker/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDisplayConfig, FileStoreConfig, StoreBackend,
};
pub use loader::ConfigLoader;
