//! Schema migration framework.
//!
//! A type-safe, linear migration chain for evolving persisted schemas:
//!
//! - All migrations are executed in order (no skipping)
//! - Each persisted entity has its own registry
//! - Data newer than the latest known version is rejected, never guessed at
//!
//! ```text
//!   session state:  1.0.0 (unversioned) ──▶ 1.1.0
//! ```

mod registry;
mod session_state;
mod traits;

pub use registry::MigrationRegistry;
pub use session_state::SessionStateV1_0ToV1_1Migration;
pub use traits::{Migration, MigrationChain, TypedMigration};

use anyhow::Result;
use semver::Version;
use serde_json::Value;
use std::sync::Arc;

use crate::dto::SESSION_STATE_V1_1_VERSION;

/// Builds the migration chain for persisted session state records.
///
/// # Errors
///
/// Returns an error if the registered steps do not form a continuous chain.
pub fn build_session_state_registry() -> Result<MigrationRegistry<Value>> {
    let latest = Version::parse(SESSION_STATE_V1_1_VERSION)?;
    let mut registry = MigrationRegistry::new(latest);
    let steps: Vec<Arc<dyn TypedMigration<Value, Value>>> =
        vec![Arc::new(SessionStateV1_0ToV1_1Migration)];
    registry.register_all(steps)?;
    Ok(registry)
}
