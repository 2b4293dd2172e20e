//! Key-value backed implementation of [`SessionStateRepository`].

use crate::dto::{SESSION_STATE_V1_0_VERSION, SessionStateDTO};
use crate::migration::{MigrationChain, MigrationRegistry, build_session_state_registry};
use chrono::{DateTime, Duration, Utc};
use izzico_core::config::AssistantConfig;
use izzico_core::session_state::{SessionState, SessionStateRepository};
use izzico_core::storage::KeyValueStore;
use izzico_core::{AssistantError, Result};
use semver::Version;
use serde_json::Value;
use std::sync::Arc;

/// Stores the session state as a single JSON record under a fixed key.
///
/// Records without a `version` field are treated as `1.0.0` and migrated
/// on read. Anything that cannot be read, parsed or migrated counts as
/// absent. Reads never delete.
pub struct KvSessionStateRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
    ttl: Duration,
    migrations: MigrationRegistry<Value>,
}

impl KvSessionStateRepository {
    /// Creates a repository using `config.storage_key` and `config.session_ttl()`.
    pub fn new(store: Arc<dyn KeyValueStore>, config: &AssistantConfig) -> Result<Self> {
        let migrations = build_session_state_registry()
            .map_err(|e| AssistantError::migration(format!("{:#}", e)))?;
        Ok(Self {
            store,
            key: config.storage_key.clone(),
            ttl: config.session_ttl(),
            migrations,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads and decodes the record regardless of age.
    ///
    /// `Ok(None)` means nothing is stored.
    pub fn load_record(&self) -> Result<Option<SessionState>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        self.decode(&raw).map(Some)
    }

    fn decode(&self, raw: &str) -> Result<SessionState> {
        let value: Value = serde_json::from_str(raw)?;
        let version_text = value
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or(SESSION_STATE_V1_0_VERSION);
        let version = Version::parse(version_text).map_err(|e| {
            AssistantError::migration(format!("Invalid version {:?}: {}", version_text, e))
        })?;

        let migrated = self
            .migrations
            .migrate_to_latest(value, &version)
            .map_err(|e| AssistantError::migration(format!("{:#}", e)))?;
        let dto: SessionStateDTO = serde_json::from_value(migrated)?;
        dto.into_domain()
            .ok_or_else(|| AssistantError::migration("Timestamp out of range"))
    }
}

impl SessionStateRepository for KvSessionStateRepository {
    fn restore(&self, now: DateTime<Utc>) -> Option<SessionState> {
        let state = match self.load_record() {
            Ok(Some(state)) => state,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("[SessionState] Ignoring unreadable record '{}': {}", self.key, e);
                return None;
            }
        };

        if state.is_stale(now, self.ttl) {
            tracing::debug!(
                "[SessionState] Record '{}' is stale (saved at {})",
                self.key,
                state.saved_at
            );
            return None;
        }

        Some(state)
    }

    fn save(&self, state: &SessionState) {
        let dto = SessionStateDTO::from_domain(state);
        let result = serde_json::to_string(&dto)
            .map_err(AssistantError::from)
            .and_then(|json| self.store.set(&self.key, &json));
        if let Err(e) = result {
            tracing::warn!("[SessionState] Failed to save '{}': {}", self.key, e);
        }
    }

    fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!("[SessionState] Failed to clear '{}': {}", self.key, e);
        }
    }
}
