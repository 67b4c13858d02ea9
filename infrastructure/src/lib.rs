//! Infrastructure layer for sleep-tracker
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileDisplayConfig, FileStoreConfig,
    StoreBackend,
};
pub use store::{InMemoryNightStore, JsonFileNightStore};
