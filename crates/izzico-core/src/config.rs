//! Assistant configuration model.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AssistantError, Result};

/// Default storage key for the persisted widget state.
pub const DEFAULT_STORAGE_KEY: &str = "izzico-assistant-state";

/// Tunables for the assistant widget.
///
/// Every field has a default, so an empty `assistant.toml` is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// The single fixed key holding the serialized `SessionState`.
    pub storage_key: String,
    /// Persisted state older than this is treated as absent.
    pub session_ttl_secs: u64,
    /// How long per-directive feedback stays visible once a batch completes.
    pub action_feedback_display_ms: u64,
    /// Pause between two consecutive directives of the same batch.
    pub action_step_delay_ms: u64,
    /// Completed turns required before the rating prompt is offered.
    pub feedback_prompt_min_turns: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            session_ttl_secs: 30 * 60,
            action_feedback_display_ms: 5_000,
            action_step_delay_ms: 300,
            feedback_prompt_min_turns: 3,
        }
    }
}

impl AssistantConfig {
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs as i64)
    }

    pub fn action_feedback_display(&self) -> Duration {
        Duration::from_millis(self.action_feedback_display_ms)
    }

    pub fn action_step_delay(&self) -> Duration {
        Duration::from_millis(self.action_step_delay_ms)
    }

    /// Rejects values that would make the widget misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(AssistantError::config("storage_key cannot be empty"));
        }
        if self.session_ttl_secs == 0 {
            return Err(AssistantError::config(
                "session_ttl_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}
