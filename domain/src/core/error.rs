//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid sleep quality: {0} (expected -1 to 5)")]
    InvalidQuality(i64),

    #[error("Night {0} is already closed")]
    NightAlreadyClosed(i64),
}
