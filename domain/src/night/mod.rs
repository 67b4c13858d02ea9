//! Night domain module
//!
//! Contains the recorded sleep session and its rating.

pub mod entities;
pub mod value_objects;

pub use entities::SleepNight;
pub use value_objects::{NightId, SleepQuality};
