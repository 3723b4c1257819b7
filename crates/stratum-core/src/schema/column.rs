use serde::{Deserialize, Serialize};

/// A single column definition within a [`Table`](super::Table).
///
/// Each variant renders itself to a MySQL column-definition fragment and
/// reports whether it was declared as the table's primary key. Rendering is
/// handled exhaustively per variant; there is no shared format path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Integer(IntegerColumn),
    Varchar(VarcharColumn),
    DateTime(DateTimeColumn),
    Enum(EnumColumn),
}

impl Column {
    /// Render this column as a DDL fragment.
    pub fn render(&self) -> String {
        match self {
            Column::Integer(c) => c.render(),
            Column::Varchar(c) => c.render(),
            Column::DateTime(c) => c.render(),
            Column::Enum(c) => c.render(),
        }
    }

    /// Whether this column was declared as the primary key.
    ///
    /// DateTime and Enum columns can never be primary.
    pub fn is_primary_key(&self) -> bool {
        match self {
            Column::Integer(c) => c.is_primary,
            Column::Varchar(c) => c.is_primary,
            Column::DateTime(_) | Column::Enum(_) => false,
        }
    }

    /// The column name.
    pub fn name(&self) -> &str {
        match self {
            Column::Integer(c) => &c.name,
            Column::Varchar(c) => &c.name,
            Column::DateTime(c) => &c.name,
            Column::Enum(c) => &c.name,
        }
    }
}

/// An integer column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerColumn {
    pub name: String,
    pub is_primary: bool,
    pub is_unsigned: bool,
    pub is_not_null: bool,
}

impl IntegerColumn {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_primary: false,
            is_unsigned: false,
            is_not_null: false,
        }
    }

    /// Mark this column as the primary key.
    ///
    /// Primary implies NOT NULL and AUTO_INCREMENT in the rendered DDL; a
    /// separate `not_null()` flag adds nothing once primary is set.
    pub fn primary(&mut self) -> &mut Self {
        self.is_primary = true;
        self
    }

    /// Mark this column NOT NULL.
    pub fn not_null(&mut self) -> &mut Self {
        self.is_not_null = true;
        self
    }

    /// Mark this column UNSIGNED.
    pub fn unsigned(&mut self) -> &mut Self {
        self.is_unsigned = true;
        self
    }

    pub fn render(&self) -> String {
        let mut output = format!("{} int", self.name);
        if self.is_unsigned {
            output.push_str(" UNSIGNED");
        }
        if self.is_primary {
            output.push_str(" NOT NULL PRIMARY KEY AUTO_INCREMENT");
        } else if self.is_not_null {
            output.push_str(" NOT NULL");
        }
        output
    }
}

/// A varchar column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarcharColumn {
    pub name: String,
    /// Maximum length. Zero means unset, rendering a bare `varchar` with no
    /// parenthesized length (dialect-dependent meaning, preserved as-is).
    pub length: u32,
    pub is_primary: bool,
    pub is_not_null: bool,
}

impl VarcharColumn {
    pub(crate) fn new(name: &str, length: u32) -> Self {
        Self {
            name: name.to_string(),
            length,
            is_primary: false,
            is_not_null: false,
        }
    }

    /// Mark this column as the primary key. Primary implies NOT NULL.
    pub fn primary(&mut self) -> &mut Self {
        self.is_primary = true;
        self
    }

    /// Mark this column NOT NULL.
    pub fn not_null(&mut self) -> &mut Self {
        self.is_not_null = true;
        self
    }

    pub fn render(&self) -> String {
        let mut output = if self.length != 0 {
            format!("{} varchar({})", self.name, self.length)
        } else {
            format!("{} varchar", self.name)
        };
        if self.is_primary {
            output.push_str(" NOT NULL PRIMARY KEY");
        } else if self.is_not_null {
            output.push_str(" NOT NULL");
        }
        output
    }
}

/// A datetime column. Never a primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeColumn {
    pub name: String,
    pub is_not_null: bool,
}

impl DateTimeColumn {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_not_null: false,
        }
    }

    /// Mark this column NOT NULL.
    pub fn not_null(&mut self) -> &mut Self {
        self.is_not_null = true;
        self
    }

    pub fn render(&self) -> String {
        let mut output = format!("{} DATETIME", self.name);
        if self.is_not_null {
            output.push_str(" NOT NULL");
        }
        output
    }
}

/// An enum column with a fixed set of allowed values. Never a primary key.
///
/// Values are rendered individually single-quoted; embedded quotes are not
/// escaped (caller responsibility).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumColumn {
    pub name: String,
    pub values: Vec<String>,
    pub is_not_null: bool,
}

impl EnumColumn {
    pub(crate) fn new(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
            is_not_null: false,
        }
    }

    /// Mark this column NOT NULL.
    pub fn not_null(&mut self) -> &mut Self {
        self.is_not_null = true;
        self
    }

    pub fn render(&self) -> String {
        let quoted = self
            .values
            .iter()
            .map(|v| format!("'{}'", v))
            .collect::<Vec<_>>()
            .join(", ");
        let mut output = format!("{} enum({})", self.name, quoted);
        if self.is_not_null {
            output.push_str(" NOT NULL");
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_render_plain() {
        assert_eq!(IntegerColumn::new("age").render(), "age int");
    }

    #[test]
    fn test_integer_render_unsigned_not_null() {
        let mut column = IntegerColumn::new("count");
        column.unsigned().not_null();
        assert_eq!(column.render(), "count int UNSIGNED NOT NULL");
    }

    #[test]
    fn test_integer_primary_wins_over_not_null() {
        let mut column = IntegerColumn::new("id");
        column.unsigned().not_null().primary();
        assert_eq!(
            column.render(),
            "id int UNSIGNED NOT NULL PRIMARY KEY AUTO_INCREMENT"
        );
        // No bare NOT NULL suffix sneaks in after the primary clause.
        assert!(!column.render().ends_with("NOT NULL"));
    }

    #[test]
    fn test_integer_setters_idempotent() {
        let mut column = IntegerColumn::new("id");
        column.primary().primary().unsigned().unsigned();
        assert_eq!(
            column.render(),
            "id int UNSIGNED NOT NULL PRIMARY KEY AUTO_INCREMENT"
        );
    }

    #[test]
    fn test_varchar_render_with_length() {
        let mut column = VarcharColumn::new("email", 255);
        column.not_null();
        assert_eq!(column.render(), "email varchar(255) NOT NULL");
    }

    #[test]
    fn test_varchar_render_zero_length_omits_parens() {
        assert_eq!(VarcharColumn::new("notes", 0).render(), "notes varchar");
    }

    #[test]
    fn test_varchar_primary_suppresses_not_null() {
        let mut column = VarcharColumn::new("slug", 64);
        column.not_null().primary();
        assert_eq!(column.render(), "slug varchar(64) NOT NULL PRIMARY KEY");
    }

    #[test]
    fn test_date_time_render() {
        let mut column = DateTimeColumn::new("createdAt");
        assert_eq!(column.render(), "createdAt DATETIME");
        column.not_null();
        assert_eq!(column.render(), "createdAt DATETIME NOT NULL");
    }

    #[test]
    fn test_enum_render_quoting() {
        let mut column = EnumColumn::new("status", &["post", "page"]);
        assert_eq!(column.render(), "status enum('post', 'page')");
        column.not_null();
        assert_eq!(column.render(), "status enum('post', 'page') NOT NULL");
    }

    #[test]
    fn test_primary_key_reporting() {
        let mut integer = IntegerColumn::new("id");
        integer.primary();
        assert!(Column::Integer(integer).is_primary_key());
        assert!(!Column::DateTime(DateTimeColumn::new("at")).is_primary_key());
        assert!(!Column::Enum(EnumColumn::new("kind", &["a"])).is_primary_key());
    }
}
