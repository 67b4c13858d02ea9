//! Domain layer for sleep-tracker
//!
//! This crate contains the core entities and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Night
//!
//! A [`SleepNight`] is one recorded sleep interval. It is *active* while its
//! end time still equals its start time; stopping it moves the end time past
//! the start. Each night carries a [`SleepQuality`] rating, unrated until the
//! user picks one.

pub mod core;
pub mod night;

// Re-export commonly used types
pub use crate::core::error::DomainError;
pub use night::{NightId, SleepNight, SleepQuality};
