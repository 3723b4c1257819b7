//! Migration application protocol: ordered declarations, the history log,
//! and the orchestrating migrator.

mod ddl;
mod log;
mod migration;
mod runner;

pub use ddl::{create_table, drop_table};
pub use log::{LogEntry, MigrationLog, LOG_TABLE, TIMESTAMP_FORMAT};
pub use migration::{ActionFuture, Migration};
pub use runner::{MigrateError, MigrateReport, MigrationStatus, Migrator};
