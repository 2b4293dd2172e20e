//! Widget session state domain model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// UI state of the assistant widget that survives page reloads.
///
/// One record per client, stored under a single fixed key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Whether the conversation panel is open.
    pub is_open: bool,
    /// Assistant messages the user already rated.
    pub rated_message_ids: BTreeSet<String>,
    /// When this record was written.
    pub saved_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(saved_at: DateTime<Utc>) -> Self {
        Self {
            is_open: false,
            rated_message_ids: BTreeSet::new(),
            saved_at,
        }
    }

    /// True when the record is older than `ttl` at `now`.
    ///
    /// A record exactly `ttl` old is still fresh.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.saved_at > ttl
    }

    pub fn is_rated(&self, message_id: &str) -> bool {
        self.rated_message_ids.contains(message_id)
    }
}
