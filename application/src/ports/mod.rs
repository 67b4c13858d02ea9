//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement,
//! and the state the presentation layer renders.

pub mod clock;
pub mod night_store;
pub mod screen_state;
