//! Tracker screens for the terminal

pub mod presenter;
pub mod repl;
pub mod runner;
