//! Opaque SQL execution capability consumed by the migration engine.
//!
//! The engine core never names a driver type; anything that can execute a
//! statement and scan rows can back a migration run. The production
//! implementation is [`MySqlExecutor`]; tests use the in-memory mock from
//! [`crate::testing`].

mod mysql;

pub use mysql::MySqlExecutor;

use std::future::Future;
use std::pin::Pin;

use stratum_core::Result;

/// Boxed future returned by executor methods, keeping the trait
/// object-safe.
pub type ExecutorFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Outcome of a statement execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Number of rows affected by the statement.
    pub rows_affected: u64,
    /// Store-assigned identifier of the last inserted row, if any.
    pub last_insert_id: Option<i64>,
}

/// A single scanned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
}

/// A row returned from a query, supporting typed nullable scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlRow {
    values: Vec<SqlValue>,
}

impl SqlRow {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    /// Scan the column at `index` as a nullable integer.
    pub fn integer(&self, index: usize) -> Option<i64> {
        match self.values.get(index) {
            Some(SqlValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// Scan the column at `index` as a nullable string.
    pub fn text(&self, index: usize) -> Option<&str> {
        match self.values.get(index) {
            Some(SqlValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Capability to run SQL against a database.
pub trait SqlExecutor: Send + Sync {
    /// Execute a statement, returning the affected-row count and the last
    /// insert id where the store assigns one.
    fn execute<'a>(&'a self, statement: &'a str) -> ExecutorFuture<'a, ExecOutcome>;

    /// Run a query, returning all rows.
    fn query<'a>(&'a self, statement: &'a str) -> ExecutorFuture<'a, Vec<SqlRow>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_typed_scanning() {
        let row = SqlRow::new(vec![
            SqlValue::Integer(7),
            SqlValue::Text("create_users_table".to_string()),
            SqlValue::Null,
        ]);

        assert_eq!(row.integer(0), Some(7));
        assert_eq!(row.text(1), Some("create_users_table"));
        assert_eq!(row.integer(2), None);
        assert_eq!(row.text(2), None);
        assert_eq!(row.text(9), None);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_scans_do_not_coerce_across_types() {
        let row = SqlRow::new(vec![SqlValue::Text("12".to_string())]);
        assert_eq!(row.integer(0), None);
    }
}
