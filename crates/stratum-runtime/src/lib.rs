pub mod executor;
pub mod migrate;
pub mod testing;

pub use executor::{ExecOutcome, MySqlExecutor, SqlExecutor, SqlRow, SqlValue};
pub use migrate::{
    create_table, drop_table, LogEntry, MigrateError, MigrateReport, Migration, MigrationLog,
    MigrationStatus, Migrator,
};
