//! SessionState record migrations.
//!
//! Migrations operate on the raw JSON value so that each step only needs to
//! understand its own source and target shapes.

use super::traits::{Migration, TypedMigration};
use crate::dto::{SESSION_STATE_V1_0_VERSION, SessionStateV1_0, SessionStateV1_1};
use anyhow::{Context, Result};
use semver::Version;
use serde_json::Value;

/// Migration from the unversioned record (1.0.0) to 1.1.0.
///
/// Changes:
/// - Add the `version` field
#[derive(Debug, Default)]
pub struct SessionStateV1_0ToV1_1Migration;

impl Migration for SessionStateV1_0ToV1_1Migration {
    fn from_version(&self) -> Version {
        Version::new(1, 0, 0)
    }

    fn to_version(&self) -> Version {
        Version::new(1, 1, 0)
    }

    fn description(&self) -> &str {
        "Add explicit schema version to session state"
    }
}

impl TypedMigration<Value, Value> for SessionStateV1_0ToV1_1Migration {
    fn migrate(&self, from: Value) -> Result<Value> {
        let old: SessionStateV1_0 = serde_json::from_value(from)
            .with_context(|| format!("Invalid {} session state", SESSION_STATE_V1_0_VERSION))?;
        serde_json::to_value(SessionStateV1_1::from(old))
            .context("Failed to serialize migrated session state")
    }
}
