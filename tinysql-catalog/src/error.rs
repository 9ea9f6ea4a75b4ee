use std::fmt;

/// An error raised when a DDL operation cannot be applied against the
/// catalog (`spec.md` §7): the referenced schema is internally
/// inconsistent, or applying the change would break it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// No table by this name exists.
    TableNotFound(String),
    /// A table by this name already exists.
    TableAlreadyExists(String),
    /// A `FOREIGN KEY` names a table that does not exist at create time.
    ReferencedTableNotFound {
        /// The table declaring the foreign key.
        table: String,
        /// The table it references.
        ref_table: String,
    },
    /// A `FOREIGN KEY` names a column that is not its target table's
    /// primary key.
    ReferencedColumnNotPrimaryKey {
        /// The referenced table.
        ref_table: String,
        /// The referenced column.
        ref_column: String,
    },
    /// `DROP TABLE` was refused because another table's foreign key
    /// still points at it.
    TableReferencedByForeignKey {
        /// The table that was asked to be dropped.
        table: String,
        /// The table whose foreign key blocks the drop.
        referencing_table: String,
    },
    /// No index exists on this (table, column) pair.
    IndexNotFound {
        /// The table.
        table: String,
        /// The column.
        column: String,
    },
    /// An index already exists on this (table, column) pair.
    IndexAlreadyExists {
        /// The table.
        table: String,
        /// The column.
        column: String,
    },
    /// `DROP INDEX` was refused because the index backs the primary key.
    CannotDropPrimaryKeyIndex {
        /// The table.
        table: String,
        /// The column.
        column: String,
    },
    /// The catalog document on disk could not be read or written.
    Io(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::TableNotFound(name) => write!(f, "no such table '{}'", name),
            SchemaError::TableAlreadyExists(name) => write!(f, "table '{}' already exists", name),
            SchemaError::ReferencedTableNotFound { table, ref_table } => write!(
                f,
                "table '{}' declares a foreign key to nonexistent table '{}'",
                table, ref_table
            ),
            SchemaError::ReferencedColumnNotPrimaryKey { ref_table, ref_column } => write!(
                f,
                "'{}' is not the primary key of '{}'",
                ref_column, ref_table
            ),
            SchemaError::TableReferencedByForeignKey { table, referencing_table } => write!(
                f,
                "cannot drop '{}': referenced by a foreign key on '{}'",
                table, referencing_table
            ),
            SchemaError::IndexNotFound { table, column } => {
                write!(f, "no index on {}.{}", table, column)
            }
            SchemaError::IndexAlreadyExists { table, column } => {
                write!(f, "an index on {}.{} already exists", table, column)
            }
            SchemaError::CannotDropPrimaryKeyIndex { table, column } => write!(
                f,
                "cannot drop the primary key index on {}.{}",
                table, column
            ),
            SchemaError::Io(message) => write!(f, "catalog I/O error: {}", message),
        }
    }
}

impl std::error::Error for SchemaError {}
