//! Presentation layer for sleep-tracker
//!
//! This crate contains the CLI definitions, terminal rendering,
//! one-shot command runner and the interactive REPL.

pub mod cli;
pub mod tracker;

// Re-export commonly used types
pub use cli::commands::{Cli, Command};
pub use tracker::presenter::TrackerPresenter;
pub use tracker::repl::{ReplCommand, TrackerRepl};
pub use tracker::runner::{CommandOutput, TrackerAction, TrackerRunner};
