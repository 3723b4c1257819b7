pub mod config;
pub mod error;
pub mod schema;

pub use config::DatabaseConfig;
pub use error::{Result, StratumError};
pub use schema::{Column, DateTimeColumn, EnumColumn, IntegerColumn, Table, VarcharColumn};
