//! Core traits for the migration framework.

use anyhow::Result;
use semver::Version;

/// Base trait for all migrations.
///
/// Provides version information and metadata about a migration step.
pub trait Migration: Send + Sync {
    /// Returns the source version this migration starts from.
    fn from_version(&self) -> Version;

    /// Returns the target version this migration produces.
    fn to_version(&self) -> Version;

    /// Checks if this migration can be applied to the given version.
    fn can_migrate(&self, version: &Version) -> bool {
        version == &self.from_version()
    }

    /// Returns a human-readable description of this migration.
    fn description(&self) -> &str;
}

/// Migration that transforms data from one version to the next.
pub trait TypedMigration<From, To>: Migration + std::fmt::Debug {
    /// Executes the migration.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be transformed.
    fn migrate(&self, from: From) -> Result<To>;
}

/// A chain of migrations that upgrades data to the latest version.
///
/// Implementations traverse every intermediate step in order; no step is
/// ever skipped.
pub trait MigrationChain<T> {
    /// Migrates data from `current_version` to the latest version.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No migration path exists from the current version to the latest
    /// - The data is newer than the latest supported version
    /// - Any migration in the chain fails
    fn migrate_to_latest(&self, data: T, current_version: &Version) -> Result<T>;

    /// Returns all available migration paths from a given version.
    fn available_paths(&self, from: &Version) -> Vec<Vec<Version>>;
}
