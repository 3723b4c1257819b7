use tracing::debug;

use stratum_core::{Result, StratumError, Table};

use crate::executor::SqlExecutor;

/// Create a table from a builder function.
///
/// The primary-key count is re-derived from the built columns rather than
/// trusted from builder state; more than one primary column fails with
/// [`StratumError::DuplicatePrimaryKey`] before any SQL is issued.
///
/// Free function so migration actions can call it with a captured executor
/// handle; [`Migrator`](super::Migrator) exposes the same operation as a
/// method.
pub async fn create_table<F>(executor: &dyn SqlExecutor, name: &str, build: F) -> Result<()>
where
    F: FnOnce() -> Table,
{
    let table = build();

    let primary_keys = table
        .columns()
        .iter()
        .filter(|column| column.is_primary_key())
        .count();
    if primary_keys > 1 {
        return Err(StratumError::DuplicatePrimaryKey(name.to_string()));
    }

    let statement = format!("CREATE TABLE {} ({})", name, table.render());
    debug!(table = name, "creating table");
    executor.execute(&statement).await?;
    Ok(())
}

/// Drop a table verbatim.
///
/// No existence check, no cascade handling, no identifier quoting; the
/// caller is trusted.
pub async fn drop_table(executor: &dyn SqlExecutor, name: &str) -> Result<()> {
    let statement = format!("DROP TABLE {}", name);
    debug!(table = name, "dropping table");
    executor.execute(&statement).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::MockExecutor;

    #[tokio::test]
    async fn test_create_table_renders_single_statement() {
        let mock = MockExecutor::new();
        create_table(&mock, "users", || {
            let mut table = Table::new();
            table.integer("id").unsigned().primary();
            table.varchar("email", 255).not_null();
            table.enumeration("status", &["post", "page"]).not_null();
            table.date_time("createdAt");
            table
        })
        .await
        .unwrap();

        assert_eq!(
            mock.statements(),
            vec![
                "CREATE TABLE users (\
                 id int UNSIGNED NOT NULL PRIMARY KEY AUTO_INCREMENT, \
                 email varchar(255) NOT NULL, \
                 status enum('post', 'page') NOT NULL, \
                 createdAt DATETIME)"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_primary_key_issues_no_sql() {
        let mock = MockExecutor::new();
        let err = create_table(&mock, "users", || {
            let mut table = Table::new();
            table.integer("id").primary();
            table.varchar("email", 255).primary();
            table
        })
        .await
        .unwrap_err();

        assert!(matches!(err, StratumError::DuplicatePrimaryKey(name) if name == "users"));
        assert!(mock.statements().is_empty());
    }

    #[tokio::test]
    async fn test_single_primary_key_is_fine() {
        let mock = MockExecutor::new();
        create_table(&mock, "tags", || {
            let mut table = Table::new();
            table.varchar("slug", 64).primary();
            table.varchar("label", 0);
            table
        })
        .await
        .unwrap();

        assert_eq!(
            mock.statements(),
            vec!["CREATE TABLE tags (slug varchar(64) NOT NULL PRIMARY KEY, label varchar)"
                .to_string()]
        );
    }

    #[tokio::test]
    async fn test_drop_table_verbatim() {
        let mock = MockExecutor::new();
        drop_table(&mock, "users").await.unwrap();
        assert_eq!(mock.statements(), vec!["DROP TABLE users".to_string()]);
    }

    #[tokio::test]
    async fn test_executor_failure_propagates() {
        let mock = MockExecutor::new();
        mock.fail_execute_containing("DROP TABLE");
        let err = drop_table(&mock, "users").await.unwrap_err();
        assert!(matches!(err, StratumError::Execution(_)));
    }
}
