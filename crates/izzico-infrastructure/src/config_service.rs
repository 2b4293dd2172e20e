//! Configuration service implementation.
//!
//! Loads [`AssistantConfig`] from `assistant.toml` and caches it.

use crate::paths::IzzicoPaths;
use izzico_core::config::AssistantConfig;
use izzico_core::{AssistantError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Loads and caches the assistant configuration.
///
/// A missing file yields the defaults. A file that exists but does not
/// parse or validate is an error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<AssistantConfig>>>,
}

impl ConfigService {
    /// Creates a service reading from the default config file location.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(IzzicoPaths::config_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<AssistantConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = Self::load_config(&self.path)?;

        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    fn load_config(path: &Path) -> Result<AssistantConfig> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("[Config] {} not found, using defaults", path.display());
                return Ok(AssistantConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: AssistantConfig = toml::from_str(&content).map_err(|e| {
            AssistantError::config(format!("Invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }
}
