use anyhow::{Context, Result};
use izzico_core::config::AssistantConfig;
use izzico_infrastructure::{
    ConfigService, IzzicoPaths, JsonFileKeyValueStore, KvSessionStateRepository,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Locations the commands read from, after applying CLI overrides.
pub struct CliPaths {
    pub config_file: PathBuf,
    pub state_dir: PathBuf,
}

impl CliPaths {
    pub fn resolve(config_file: Option<PathBuf>, state_dir: Option<PathBuf>) -> Result<Self> {
        let config_file = match config_file {
            Some(path) => path,
            None => IzzicoPaths::config_file().context("Failed to resolve config file")?,
        };
        let state_dir = match state_dir {
            Some(path) => path,
            None => IzzicoPaths::state_dir().context("Failed to resolve state directory")?,
        };
        Ok(Self {
            config_file,
            state_dir,
        })
    }

    pub fn load_config(&self) -> Result<AssistantConfig> {
        ConfigService::with_path(&self.config_file)
            .get_config()
            .with_context(|| format!("Failed to load {}", self.config_file.display()))
    }

    pub fn session_repository(&self, config: &AssistantConfig) -> Result<KvSessionStateRepository> {
        let store = Arc::new(JsonFileKeyValueStore::new(&self.state_dir));
        Ok(KvSessionStateRepository::new(store, config)?)
    }
}
