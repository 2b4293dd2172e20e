//! Key-value store adapters.

mod json_file;
mod memory;

pub use json_file::JsonFileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
