//! Linear migration chains.
//!
//! Each version migrates through all intermediate versions. This keeps every
//! step small and the path debuggable.

use super::traits::{MigrationChain, TypedMigration};
use anyhow::{Context, Result};
use semver::Version;
use std::sync::Arc;

/// Registry for a linear chain of migrations: V1.0.0 → V1.1.0 → V2.0.0 → ...
///
/// `register()` validates that each new migration starts where the previous
/// one ended.
#[derive(Debug)]
pub struct MigrationRegistry<T> {
    /// Migrations in order, forming a linear chain.
    migrations: Vec<Arc<dyn TypedMigration<T, T>>>,
    /// The latest version this registry can migrate to.
    latest_version: Version,
}

impl<T> MigrationRegistry<T> {
    pub fn new(latest_version: Version) -> Self {
        Self {
            migrations: Vec::new(),
            latest_version,
        }
    }

    pub fn latest_version(&self) -> &Version {
        &self.latest_version
    }

    /// Registers a single migration.
    ///
    /// # Errors
    ///
    /// Fails if the migration does not connect to the existing chain or
    /// targets a version beyond the registry's latest.
    pub fn register(&mut self, migration: Arc<dyn TypedMigration<T, T>>) -> Result<()> {
        if let Some(last) = self.migrations.last() {
            if last.to_version() != migration.from_version() {
                anyhow::bail!(
                    "Migration chain broken: expected migration from {} but got migration from {} ('{}' -> '{}')",
                    last.to_version(),
                    migration.from_version(),
                    last.description(),
                    migration.description()
                );
            }
        }

        if migration.to_version() > self.latest_version {
            anyhow::bail!(
                "Migration target version {} exceeds registry's latest version {}",
                migration.to_version(),
                self.latest_version
            );
        }

        self.migrations.push(migration);
        Ok(())
    }

    /// Registers migrations in order.
    pub fn register_all(&mut self, migrations: Vec<Arc<dyn TypedMigration<T, T>>>) -> Result<()> {
        for migration in migrations {
            self.register(migration)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    fn find_start_index(&self, from_version: &Version) -> Option<usize> {
        self.migrations.iter().position(|m| m.can_migrate(from_version))
    }
}

impl<T> MigrationChain<T> for MigrationRegistry<T> {
    fn migrate_to_latest(&self, mut data: T, current_version: &Version) -> Result<T> {
        if current_version == &self.latest_version {
            return Ok(data);
        }

        if current_version > &self.latest_version {
            anyhow::bail!(
                "Data version ({}) is newer than the latest supported version ({})",
                current_version,
                self.latest_version
            );
        }

        let start_idx = self.find_start_index(current_version).ok_or_else(|| {
            let available: Vec<String> = self
                .migrations
                .iter()
                .map(|m| format!("{} -> {}", m.from_version(), m.to_version()))
                .collect();
            anyhow::anyhow!(
                "No migration found starting from version {}. Available migrations: [{}]",
                current_version,
                available.join(", ")
            )
        })?;

        let steps = self.migrations.len() - start_idx;
        tracing::debug!(
            "[Migration] {} -> {} ({} steps)",
            current_version,
            self.latest_version,
            steps
        );

        for (i, migration) in self.migrations[start_idx..].iter().enumerate() {
            data = migration.migrate(data).with_context(|| {
                format!(
                    "Migration failed at step {}: {} -> {}",
                    i + 1,
                    migration.from_version(),
                    migration.to_version()
                )
            })?;
        }

        Ok(data)
    }

    fn available_paths(&self, from: &Version) -> Vec<Vec<Version>> {
        // Linear chain: at most one path exists
        match self.find_start_index(from) {
            Some(start_idx) => {
                let mut path = vec![from.clone()];
                path.extend(self.migrations[start_idx..].iter().map(|m| m.to_version()));
                vec![path]
            }
            None => vec![],
        }
    }
}
