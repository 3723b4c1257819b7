use serde::{Deserialize, Serialize};

use super::column::{Column, DateTimeColumn, EnumColumn, IntegerColumn, VarcharColumn};

/// An ordered collection of column definitions.
///
/// Insertion order is preserved and becomes column order in the generated
/// DDL. Column-name uniqueness is not enforced here; duplicates are left for
/// the database to reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table definition.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Append an integer column and return it so flags can be chained.
    pub fn integer(&mut self, name: &str) -> &mut IntegerColumn {
        self.columns.push(Column::Integer(IntegerColumn::new(name)));
        match self.columns.last_mut() {
            Some(Column::Integer(column)) => column,
            _ => unreachable!("just pushed an integer column"),
        }
    }

    /// Append a varchar column. A `length` of zero renders an unbounded
    /// `varchar`.
    pub fn varchar(&mut self, name: &str, length: u32) -> &mut VarcharColumn {
        self.columns
            .push(Column::Varchar(VarcharColumn::new(name, length)));
        match self.columns.last_mut() {
            Some(Column::Varchar(column)) => column,
            _ => unreachable!("just pushed a varchar column"),
        }
    }

    /// Append a datetime column.
    pub fn date_time(&mut self, name: &str) -> &mut DateTimeColumn {
        self.columns
            .push(Column::DateTime(DateTimeColumn::new(name)));
        match self.columns.last_mut() {
            Some(Column::DateTime(column)) => column,
            _ => unreachable!("just pushed a datetime column"),
        }
    }

    /// Append an enum column with the given allowed values.
    pub fn enumeration(&mut self, name: &str, values: &[&str]) -> &mut EnumColumn {
        self.columns
            .push(Column::Enum(EnumColumn::new(name, values)));
        match self.columns.last_mut() {
            Some(Column::Enum(column)) => column,
            _ => unreachable!("just pushed an enum column"),
        }
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Render the comma-joined column-definition body of a CREATE TABLE
    /// statement.
    pub fn render(&self) -> String {
        self.columns
            .iter()
            .map(Column::render)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
