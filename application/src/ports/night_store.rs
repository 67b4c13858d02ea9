//! Night store port
//!
//! Defines the interface to the persistence layer that records sleep nights.

use async_trait::async_trait;
use sleep_domain::{NightId, SleepNight};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store data is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Night {0} not found")]
    NotFound(NightId),

    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Store error: {0}")]
    Other(String),
}

/// Key-ordered store of recorded nights
///
/// Implementations assign ids on insert (monotonically increasing) and must
/// serialize their own access; callers may issue calls from several tasks.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait NightStore: Send + Sync {
    /// Observe the full history, most recent first.
    ///
    /// The receiver is updated after every successful mutation, before the
    /// mutating call returns.
    fn all_nights(&self) -> watch::Receiver<Vec<SleepNight>>;

    /// The most recently created night, if any.
    async fn current_night(&self) -> Result<Option<SleepNight>, StoreError>;

    /// Look up a night by id.
    async fn get(&self, id: NightId) -> Result<Option<SleepNight>, StoreError>;

    /// Persist a new night. The night's own id is ignored; the assigned id is returned.
    async fn insert(&self, night: &SleepNight) -> Result<NightId, StoreError>;

    /// Overwrite an existing night (matched by id).
    async fn update(&self, night: &SleepNight) -> Result<(), StoreError>;

    /// Remove every night.
    async fn delete_all(&self) -> Result<(), StoreError>;
}
