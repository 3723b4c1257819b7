use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use tracing::debug;

use stratum_core::{Result, StratumError, Table};

use crate::executor::SqlExecutor;

/// Name of the bookkeeping table.
pub const LOG_TABLE: &str = "migrations";

/// Wire format for the `runAt` column: no timezone, no fractional seconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the migration log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Store-assigned identifier.
    pub id: i64,
    /// Name of the applied migration.
    pub name: String,
    /// When the migration ran.
    pub run_at: NaiveDateTime,
}

/// Persistent record of executed migrations, with an in-memory cache.
///
/// The cache is rebuilt wholesale by [`fetch`](MigrationLog::fetch) and is
/// append-only for the rest of the run; it reflects history "as of last
/// fetch", not live storage. It must not be shared across concurrent runs
/// without external synchronization.
pub struct MigrationLog {
    executor: Arc<dyn SqlExecutor>,
    entries: Vec<LogEntry>,
}

impl MigrationLog {
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self {
            executor,
            entries: Vec::new(),
        }
    }

    /// Schema of the bookkeeping table, declared with the table builder
    /// itself.
    fn table_schema() -> Table {
        let mut table = Table::new();
        table.integer("id").unsigned().primary();
        table.varchar("name", 255).not_null();
        table.date_time("runAt").not_null();
        table
    }

    /// Create the bookkeeping table if it does not already exist.
    pub async fn ensure_table(&self) -> Result<()> {
        let statement = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            LOG_TABLE,
            Self::table_schema().render()
        );
        self.executor
            .execute(&statement)
            .await
            .map_err(|e| StratumError::LogBootstrap(e.to_string()))?;
        Ok(())
    }

    /// Reload the cache wholesale from storage.
    ///
    /// A single malformed row aborts the whole fetch (no partial result);
    /// the cache keeps its previous contents on error.
    pub async fn fetch(&mut self) -> Result<()> {
        let statement = format!("SELECT id, name, runAt FROM {}", LOG_TABLE);
        let rows = self
            .executor
            .query(&statement)
            .await
            .map_err(|e| StratumError::LogRead(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = row
                .integer(0)
                .ok_or_else(|| StratumError::LogRead("log row has no id".to_string()))?;
            let name = row
                .text(1)
                .ok_or_else(|| StratumError::LogRead("log row has no name".to_string()))?
                .to_string();
            let raw_run_at = row
                .text(2)
                .ok_or_else(|| StratumError::LogRead("log row has no runAt".to_string()))?;
            let run_at = NaiveDateTime::parse_from_str(raw_run_at, TIMESTAMP_FORMAT)
                .map_err(|e| StratumError::LogRead(format!("bad runAt '{}': {}", raw_run_at, e)))?;
            entries.push(LogEntry { id, name, run_at });
        }

        debug!(entries = entries.len(), "fetched migration log");
        self.entries = entries;
        Ok(())
    }

    /// Record a successful migration and append it to the cache.
    pub async fn append(&mut self, name: &str) -> Result<()> {
        let stamp = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();
        let statement = format!(
            "INSERT INTO {} (name, runAt) VALUES ('{}', '{}')",
            LOG_TABLE, name, stamp
        );
        let outcome = self
            .executor
            .execute(&statement)
            .await
            .map_err(|e| StratumError::LogWrite(e.to_string()))?;
        let id = outcome
            .last_insert_id
            .ok_or_else(|| StratumError::LogWrite("store assigned no row id".to_string()))?;

        // Re-parse the formatted stamp so the cached timestamp is exactly
        // what was persisted, sub-second precision dropped.
        let run_at = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT)
            .map_err(|e| StratumError::LogWrite(e.to_string()))?;
        self.entries.push(LogEntry {
            id,
            name: name.to_string(),
            run_at,
        });
        Ok(())
    }

    /// Whether a migration with this exact name has run. Case-sensitive,
    /// scans every cached entry.
    pub fn has_run(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Cached entries, in storage order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::MockExecutor;

    fn log_with_mock() -> (Arc<MockExecutor>, MigrationLog) {
        let mock = Arc::new(MockExecutor::new());
        let log = MigrationLog::new(Arc::clone(&mock) as Arc<dyn SqlExecutor>);
        (mock, log)
    }

    #[tokio::test]
    async fn test_ensure_table_issues_guarded_create() {
        let (mock, log) = log_with_mock();
        log.ensure_table().await.unwrap();

        assert_eq!(
            mock.statements(),
            vec![
                "CREATE TABLE IF NOT EXISTS migrations (\
                 id int UNSIGNED NOT NULL PRIMARY KEY AUTO_INCREMENT, \
                 name varchar(255) NOT NULL, runAt DATETIME NOT NULL)"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_ensure_table_failure_maps_to_bootstrap_error() {
        let (mock, log) = log_with_mock();
        mock.fail_execute_containing("CREATE TABLE IF NOT EXISTS");

        let err = log.ensure_table().await.unwrap_err();
        assert!(matches!(err, StratumError::LogBootstrap(_)));
    }

    #[tokio::test]
    async fn test_fetch_replaces_cache_wholesale() {
        let (mock, mut log) = log_with_mock();
        mock.seed_log("create_users_table", "2024-01-15 10:30:00");
        mock.seed_log("add_posts", "2024-01-16 09:00:00");

        log.fetch().await.unwrap();
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[0].name, "create_users_table");
        assert_eq!(
            log.entries()[1].run_at,
            NaiveDateTime::parse_from_str("2024-01-16 09:00:00", TIMESTAMP_FORMAT).unwrap()
        );
    }

    #[tokio::test]
    async fn test_fetch_aborts_on_malformed_timestamp() {
        let (mock, mut log) = log_with_mock();
        mock.seed_log("good", "2024-01-15 10:30:00");
        mock.seed_log("bad", "yesterday-ish");

        let err = log.fetch().await.unwrap_err();
        assert!(matches!(err, StratumError::LogRead(_)));
        // No partial result.
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_wraps_query_failure() {
        let (mock, mut log) = log_with_mock();
        mock.fail_queries();

        let err = log.fetch().await.unwrap_err();
        assert!(matches!(err, StratumError::LogRead(_)));
    }

    #[tokio::test]
    async fn test_append_caches_store_assigned_id() {
        let (mock, mut log) = log_with_mock();
        log.append("create_users_table").await.unwrap();

        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].id, 1);
        assert!(log.has_run("create_users_table"));
        assert_eq!(mock.log_rows().len(), 1);
    }

    #[tokio::test]
    async fn test_append_failure_maps_to_write_error() {
        let (mock, mut log) = log_with_mock();
        mock.fail_execute_containing("INSERT INTO migrations");

        let err = log.append("create_users_table").await.unwrap_err();
        assert!(matches!(err, StratumError::LogWrite(_)));
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_has_run_is_case_sensitive() {
        let (mock, mut log) = log_with_mock();
        mock.seed_log("Foo", "2024-01-15 10:30:00");
        log.fetch().await.unwrap();

        assert!(log.has_run("Foo"));
        assert!(!log.has_run("foo"));
        assert!(!log.has_run("Fo"));
    }
}
