//! Night store adapters
//!
//! Both adapters implement the [`NightStore`](sleep_application::NightStore)
//! port over the same key-ordered table.

mod json_file;
mod memory;
mod table;

pub use json_file::JsonFileNightStore;
pub use memory::InMemoryNightStore;
