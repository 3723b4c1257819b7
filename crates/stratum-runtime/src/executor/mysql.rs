use std::time::Duration;

use chrono::NaiveDateTime;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row};

use stratum_core::{DatabaseConfig, Result, StratumError};

use super::{ExecOutcome, ExecutorFuture, SqlExecutor, SqlRow, SqlValue};
use crate::migrate::TIMESTAMP_FORMAT;

/// MySQL-backed executor over a sqlx connection pool.
///
/// MySQL is the dialect the generated DDL targets: `int UNSIGNED`,
/// `AUTO_INCREMENT`, `enum(...)` and `last_insert_id` all line up with what
/// the column model renders and the migration log expects.
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    /// Connect a pool using the given configuration.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.pool_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| StratumError::Execution(format!("failed to connect: {}", e)))?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl SqlExecutor for MySqlExecutor {
    fn execute<'a>(&'a self, statement: &'a str) -> ExecutorFuture<'a, ExecOutcome> {
        Box::pin(async move {
            let result = sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StratumError::Execution(e.to_string()))?;
            Ok(ExecOutcome {
                rows_affected: result.rows_affected(),
                last_insert_id: Some(result.last_insert_id() as i64),
            })
        })
    }

    fn query<'a>(&'a self, statement: &'a str) -> ExecutorFuture<'a, Vec<SqlRow>> {
        Box::pin(async move {
            let rows = sqlx::query(statement)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StratumError::Execution(e.to_string()))?;
            rows.iter().map(scan_row).collect()
        })
    }
}

/// Decode every column of a driver row into the engine's scan model.
///
/// Only the shapes the migration log reads are supported: nullable
/// integers, nullable strings, and DATETIME values, the last re-rendered in
/// the log's wire format so timestamp handling stays in one place.
fn scan_row(row: &MySqlRow) -> Result<SqlRow> {
    let mut values = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
            values.push(value.map(SqlValue::Integer).unwrap_or(SqlValue::Null));
        } else if let Ok(value) = row.try_get::<Option<u64>, _>(index) {
            values.push(
                value
                    .map(|v| SqlValue::Integer(v as i64))
                    .unwrap_or(SqlValue::Null),
            );
        } else if let Ok(value) = row.try_get::<Option<String>, _>(index) {
            values.push(value.map(SqlValue::Text).unwrap_or(SqlValue::Null));
        } else if let Ok(value) = row.try_get::<Option<NaiveDateTime>, _>(index) {
            values.push(
                value
                    .map(|ts| SqlValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()))
                    .unwrap_or(SqlValue::Null),
            );
        } else {
            return Err(StratumError::Execution(format!(
                "unsupported column type for '{}'",
                row.column(index).name()
            )));
        }
    }
    Ok(SqlRow::new(values))
}
