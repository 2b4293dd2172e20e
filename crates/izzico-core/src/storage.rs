//! Durable client-side key-value storage port.

use crate::error::Result;

/// String key-value store, the equivalent of browser local storage.
///
/// Operations are synchronous: a successful `set` has completed before it
/// returns, which the pre-navigation save relies on.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
