mod column;
mod table;

pub use column::{Column, DateTimeColumn, EnumColumn, IntegerColumn, VarcharColumn};
pub use table::Table;
