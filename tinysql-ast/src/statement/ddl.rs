use std::fmt;

use crate::types::DataType;
use crate::utils::display_comma_separated;

/// A single column declaration inside `CREATE TABLE (...)` (`spec.md` §3).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDef {
    /// Column name, unique within the table.
    pub name: String,
    /// One of the two scalar types.
    pub data_type: DataType,
    /// `PRIMARY KEY` was declared on this column.
    pub is_primary_key: bool,
    /// `AUTO_INCREMENT` was declared on this column.
    pub is_auto_increment: bool,
    /// `NOT NULL` was declared on this column.
    pub is_not_null: bool,
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if self.is_primary_key {
            f.write_str(" PRIMARY KEY")?;
        }
        if self.is_auto_increment {
            f.write_str(" AUTO_INCREMENT")?;
        }
        if self.is_not_null {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}

/// A standalone `FOREIGN KEY (col) REFERENCES table(col)` constraint.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForeignKeyDef {
    /// The referencing column, declared on this table.
    pub column: String,
    /// The referenced table.
    pub ref_table: String,
    /// The referenced column (must be `ref_table`'s primary key).
    pub ref_column: String,
}

impl fmt::Display for ForeignKeyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FOREIGN KEY ({}) REFERENCES {}({})",
            self.column, self.ref_table, self.ref_column
        )
    }
}

/// `CREATE TABLE name (col_def_list)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateTableStmt {
    /// The table being created.
    pub name: String,
    /// Column declarations, in source order.
    pub columns: Vec<ColumnDef>,
    /// Standalone `FOREIGN KEY` constraints.
    pub foreign_keys: Vec<ForeignKeyDef>,
}

impl fmt::Display for CreateTableStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CREATE TABLE {} ({})",
            self.name,
            display_comma_separated(&self.columns)
        )
    }
}

/// `DROP TABLE name`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropTableStmt {
    /// The table being dropped.
    pub name: String,
}

impl fmt::Display for DropTableStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP TABLE {}", self.name)
    }
}

/// `CREATE INDEX ON table (column)`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateIndexStmt {
    /// The table to index.
    pub table: String,
    /// The column to index.
    pub column: String,
}

impl fmt::Display for CreateIndexStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE INDEX ON {} ({})", self.table, self.column)
    }
}

/// `DROP INDEX ON table (column)`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropIndexStmt {
    /// The indexed table.
    pub table: String,
    /// The indexed column.
    pub column: String,
}

impl fmt::Display for DropIndexStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP INDEX ON {} ({})", self.table, self.column)
    }
}
