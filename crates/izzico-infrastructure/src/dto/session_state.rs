//! SessionState DTOs.
//!
//! Wire format of the widget state stored under the fixed storage key:
//!
//! ```json
//! {"version": "1.1.0", "isOpen": true, "ratedMessages": ["m1"], "timestamp": 1700000000000}
//! ```
//!
//! Records written before versioning carry no `version` field and are read
//! as V1.0.0.

use chrono::{DateTime, TimeZone, Utc};
use izzico_core::session_state::SessionState;
use serde::{Deserialize, Serialize};

/// Version assumed for records without a `version` field.
pub const SESSION_STATE_V1_0_VERSION: &str = "1.0.0";

/// Version written by this build.
pub const SESSION_STATE_V1_1_VERSION: &str = "1.1.0";

/// Session state V1.0.0 (unversioned legacy record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateV1_0 {
    pub is_open: bool,
    #[serde(default)]
    pub rated_messages: Vec<String>,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
}

/// Session state V1.1.0.
///
/// Adds the explicit `version` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateV1_1 {
    pub version: String,
    pub is_open: bool,
    #[serde(default)]
    pub rated_messages: Vec<String>,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
}

/// Type alias for the latest SessionState version.
pub type SessionStateDTO = SessionStateV1_1;

impl From<SessionStateV1_0> for SessionStateV1_1 {
    fn from(old: SessionStateV1_0) -> Self {
        Self {
            version: SESSION_STATE_V1_1_VERSION.to_string(),
            is_open: old.is_open,
            rated_messages: old.rated_messages,
            timestamp: old.timestamp,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl SessionStateV1_1 {
    pub fn from_domain(state: &SessionState) -> Self {
        Self {
            version: SESSION_STATE_V1_1_VERSION.to_string(),
            is_open: state.is_open,
            rated_messages: state.rated_message_ids.iter().cloned().collect(),
            timestamp: state.saved_at.timestamp_millis(),
        }
    }

    /// Converts to the domain model. Returns `None` for an out-of-range
    /// timestamp.
    pub fn into_domain(self) -> Option<SessionState> {
        let saved_at: DateTime<Utc> = Utc.timestamp_millis_opt(self.timestamp).single()?;
        Some(SessionState {
            is_open: self.is_open,
            rated_message_ids: self.rated_messages.into_iter().collect(),
            saved_at,
        })
    }
}
