//! Session state repository trait.

use chrono::{DateTime, Utc};

use super::model::SessionState;

/// Persists the widget's [`SessionState`] with a staleness policy.
///
/// None of these operations fails from the caller's point of view: storage
/// errors are logged by implementations and the widget keeps working
/// in memory.
pub trait SessionStateRepository: Send + Sync {
    /// Loads the stored record.
    ///
    /// Returns `None` when nothing is stored, the record is unreadable, or it
    /// is older than the TTL at `now`. Stale records are left in storage.
    fn restore(&self, now: DateTime<Utc>) -> Option<SessionState>;

    /// Writes `state`, replacing any previous record.
    fn save(&self, state: &SessionState);

    /// Removes the stored record.
    fn clear(&self);
}
