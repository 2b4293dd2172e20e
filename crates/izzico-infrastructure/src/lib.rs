//! Infrastructure layer for the izzico assistant.
//!
//! Storage adapters, the versioned session state record, and configuration
//! loading.

pub mod config_service;
pub mod dto;
pub mod migration;
pub mod paths;
pub mod session_state_repository;
pub mod storage;

pub use config_service::ConfigService;
pub use paths::IzzicoPaths;
pub use session_state_repository::KvSessionStateRepository;
pub use storage::{InMemoryKeyValueStore, JsonFileKeyValueStore};
