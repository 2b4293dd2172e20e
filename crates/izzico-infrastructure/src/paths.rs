//! Path management for izzico configuration and state files.

use izzico_core::{AssistantError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "izzico";

/// Resolves platform directories for the assistant.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/izzico/            # Config directory
/// └── assistant.toml           # Assistant configuration
///
/// ~/.local/share/izzico/       # Data directory
/// └── state/                   # Key-value store (one JSON file per key)
///     └── izzico-assistant-state.json
/// ```
pub struct IzzicoPaths;

impl IzzicoPaths {
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| AssistantError::config("Cannot find config directory"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| AssistantError::config("Cannot find data directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("assistant.toml"))
    }

    /// Directory backing the file key-value store.
    pub fn state_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("state"))
    }
}
