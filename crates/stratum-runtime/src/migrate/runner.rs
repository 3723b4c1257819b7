use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use stratum_core::{Result, StratumError, Table};

use crate::executor::SqlExecutor;

use super::ddl;
use super::log::{MigrationLog, TIMESTAMP_FORMAT};
use super::migration::Migration;

/// Result of a completed migration run.
#[derive(Debug, Clone, Serialize)]
pub struct MigrateReport {
    /// Number of migrations newly applied in this run.
    pub applied: usize,
    /// Names of the newly applied migrations, in application order.
    pub applied_names: Vec<String>,
}

/// A halted migration run.
///
/// Carries the count of migrations that had already succeeded in this run
/// together with the triggering error, so the caller can reconcile applied
/// vs. pending state; nothing is rolled back automatically.
#[derive(Debug, Error)]
#[error("migration run halted after {applied} applied: {source}")]
pub struct MigrateError {
    pub applied: usize,
    #[source]
    pub source: StratumError,
}

/// Applied/pending status of one registered migration.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationStatus {
    pub name: String,
    pub applied: bool,
}

/// Orchestrates a migration run against one database.
///
/// Holds the ordered migration list (set once), the executor handle, and
/// the log cache for the duration of a run. Two concurrent migrators
/// pointed at the same database can race on the applied check; nothing
/// locks the log table.
pub struct Migrator {
    executor: Arc<dyn SqlExecutor>,
    migrations: Vec<Migration>,
    log: MigrationLog,
}

impl Migrator {
    /// Create a migrator bound to an executor.
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        let log = MigrationLog::new(Arc::clone(&executor));
        Self {
            executor,
            migrations: Vec::new(),
            log,
        }
    }

    /// Register the ordered migration list.
    ///
    /// The producer is evaluated once; the order it returns is the order
    /// migrations run in. No sorting, deduplication, or dependency
    /// resolution happens here.
    pub fn set_migrations<F>(&mut self, produce: F)
    where
        F: FnOnce() -> Vec<Migration>,
    {
        self.migrations = produce();
    }

    /// Handle to the executor, for building migration actions around it.
    pub fn executor(&self) -> Arc<dyn SqlExecutor> {
        Arc::clone(&self.executor)
    }

    /// Apply every registered migration not yet present in the log.
    ///
    /// Runs strictly sequentially in registration order. Already-applied
    /// migrations are skipped, counting as neither success nor failure. The
    /// first failure halts the run; migrations after it are never
    /// attempted.
    pub async fn migrate(&mut self) -> std::result::Result<MigrateReport, MigrateError> {
        if let Err(e) = self.log.ensure_table().await {
            // Historical fire-and-forget bootstrap: observed, not fatal.
            warn!(error = %e, "could not ensure migration log table");
        }

        self.log.fetch().await.map_err(|e| MigrateError {
            applied: 0,
            source: e,
        })?;

        let mut applied_names: Vec<String> = Vec::new();
        for migration in &self.migrations {
            if self.log.has_run(migration.name()) {
                continue;
            }

            if let Err(e) = migration.forward().await {
                return Err(MigrateError {
                    applied: applied_names.len(),
                    source: StratumError::MigrationAction {
                        name: migration.name().to_string(),
                        source: Box::new(e),
                    },
                });
            }

            self.log
                .append(migration.name())
                .await
                .map_err(|e| MigrateError {
                    applied: applied_names.len(),
                    source: e,
                })?;

            let applied_at = self
                .log
                .entries()
                .last()
                .map(|entry| entry.run_at.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default();
            info!(migration = migration.name(), %applied_at, "applied migration");
            applied_names.push(migration.name().to_string());
        }

        Ok(MigrateReport {
            applied: applied_names.len(),
            applied_names,
        })
    }

    /// Applied/pending status of every registered migration against the
    /// current log contents.
    pub async fn status(&mut self) -> Result<Vec<MigrationStatus>> {
        self.log.fetch().await?;
        Ok(self
            .migrations
            .iter()
            .map(|migration| MigrationStatus {
                name: migration.name().to_string(),
                applied: self.log.has_run(migration.name()),
            })
            .collect())
    }

    /// Create a table from a builder function. See [`ddl::create_table`].
    pub async fn create_table<F>(&self, name: &str, build: F) -> Result<()>
    where
        F: FnOnce() -> Table,
    {
        ddl::create_table(self.executor.as_ref(), name, build).await
    }

    /// Drop a table verbatim. See [`ddl::drop_table`].
    pub async fn drop_table(&self, name: &str) -> Result<()> {
        ddl::drop_table(self.executor.as_ref(), name).await
    }
}
