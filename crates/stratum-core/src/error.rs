use thiserror::Error;

/// Core error type for stratum operations.
#[derive(Error, Debug)]
pub enum StratumError {
    /// More than one column in a single table declared primary-key status.
    /// Detected before any DDL is executed.
    #[error("more than one primary key declared for table '{0}'")]
    DuplicatePrimaryKey(String),

    #[error("migration log bootstrap failed: {0}")]
    LogBootstrap(String),

    #[error("migration log read failed: {0}")]
    LogRead(String),

    #[error("migration log write failed: {0}")]
    LogWrite(String),

    /// A forward action failed. Carries the underlying cause.
    #[error("migration '{name}' failed: {source}")]
    MigrationAction {
        name: String,
        #[source]
        source: Box<StratumError>,
    },

    #[error("statement execution failed: {0}")]
    Execution(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using StratumError.
pub type Result<T> = std::result::Result<T, StratumError>;
