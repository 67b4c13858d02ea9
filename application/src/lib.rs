//! Application layer for sleep-tracker
//!
//! This crate contains the screen controllers, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod history;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BehaviorConfig, DEFAULT_TIME_FORMAT, DisplayConfig, DisplayTimezone};
pub use history::{format_duration, format_nights, format_timestamp};
pub use ports::{
    clock::{Clock, SystemClock},
    night_store::{NightStore, StoreError},
    screen_state::{Pending, QualityScreenState, SleepScreenState, Snackbar},
};
pub use use_cases::shared::TrackerError;
pub use use_cases::sleep_quality::SleepQualityController;
pub use use_cases::sleep_session::{SleepSessionController, StateSubscription};
