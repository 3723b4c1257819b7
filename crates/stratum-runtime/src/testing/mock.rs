use std::sync::RwLock;

use stratum_core::StratumError;

use crate::executor::{ExecOutcome, ExecutorFuture, SqlExecutor, SqlRow, SqlValue};
use crate::migrate::LOG_TABLE;

/// In-memory executor for tests.
///
/// Records every successfully executed statement, in order, and simulates
/// the migration bookkeeping table: inserts against it are parsed back into
/// rows that later queries return, with store-assigned incrementing ids.
/// Failures can be injected per statement substring.
///
/// # Example
///
/// ```ignore
/// let mock = Arc::new(MockExecutor::new());
/// mock.seed_log("create_users_table", "2024-01-15 10:30:00");
/// mock.fail_execute_containing("DROP TABLE");
/// ```
pub struct MockExecutor {
    state: RwLock<MockState>,
}

struct MockState {
    statements: Vec<String>,
    log_rows: Vec<(i64, String, String)>,
    next_id: i64,
    fail_execute_containing: Option<String>,
    fail_queries: bool,
}

impl MockExecutor {
    /// Create a mock with an empty log table.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MockState {
                statements: Vec::new(),
                log_rows: Vec::new(),
                next_id: 1,
                fail_execute_containing: None,
                fail_queries: false,
            }),
        }
    }

    /// Preload a log row, as if a previous run had applied `name` at
    /// `run_at` (wire format, `YYYY-MM-DD HH:MM:SS`).
    pub fn seed_log(&self, name: &str, run_at: &str) {
        let mut state = self.state.write().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state
            .log_rows
            .push((id, name.to_string(), run_at.to_string()));
    }

    /// Fail any `execute` whose statement contains `needle`.
    pub fn fail_execute_containing(&self, needle: &str) {
        self.state.write().unwrap().fail_execute_containing = Some(needle.to_string());
    }

    /// Fail every `query`.
    pub fn fail_queries(&self) {
        self.state.write().unwrap().fail_queries = true;
    }

    /// Every successfully executed statement, in order.
    pub fn statements(&self) -> Vec<String> {
        self.state.read().unwrap().statements.clone()
    }

    /// Rows currently in the simulated log table, as `(id, name, runAt)`.
    pub fn log_rows(&self) -> Vec<(i64, String, String)> {
        self.state.read().unwrap().log_rows.clone()
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlExecutor for MockExecutor {
    fn execute<'a>(&'a self, statement: &'a str) -> ExecutorFuture<'a, ExecOutcome> {
        Box::pin(async move {
            let mut state = self.state.write().unwrap();
            if let Some(needle) = &state.fail_execute_containing {
                if statement.contains(needle.as_str()) {
                    return Err(StratumError::Execution(format!(
                        "injected failure for: {}",
                        statement
                    )));
                }
            }
            state.statements.push(statement.to_string());

            if let Some((name, run_at)) = parse_log_insert(statement) {
                let id = state.next_id;
                state.next_id += 1;
                state.log_rows.push((id, name, run_at));
                return Ok(ExecOutcome {
                    rows_affected: 1,
                    last_insert_id: Some(id),
                });
            }

            Ok(ExecOutcome {
                rows_affected: 0,
                last_insert_id: None,
            })
        })
    }

    fn query<'a>(&'a self, statement: &'a str) -> ExecutorFuture<'a, Vec<SqlRow>> {
        Box::pin(async move {
            let state = self.state.read().unwrap();
            if state.fail_queries {
                return Err(StratumError::Execution(
                    "injected query failure".to_string(),
                ));
            }
            if !statement.contains(&format!("FROM {}", LOG_TABLE)) {
                return Ok(Vec::new());
            }
            Ok(state
                .log_rows
                .iter()
                .map(|(id, name, run_at)| {
                    SqlRow::new(vec![
                        SqlValue::Integer(*id),
                        SqlValue::Text(name.clone()),
                        SqlValue::Text(run_at.clone()),
                    ])
                })
                .collect())
        })
    }
}

/// Parse a `INSERT INTO migrations (name, runAt) VALUES ('..', '..')`
/// statement as generated by the migration log.
fn parse_log_insert(statement: &str) -> Option<(String, String)> {
    if !statement.starts_with(&format!("INSERT INTO {}", LOG_TABLE)) {
        return None;
    }
    let mut quoted = statement.split('\'');
    let _ = quoted.next()?;
    let name = quoted.next()?.to_string();
    let _ = quoted.next()?;
    let run_at = quoted.next()?.to_string();
    Some((name, run_at))
}
