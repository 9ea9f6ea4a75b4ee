use std::fmt;

use tinysql_catalog::SchemaError;
use tinysql_storage::{IndexError, StorageError};
use tinysql_validator::ValidationError;

/// A constraint violated while running a validated, optimized statement
/// (`spec.md` §7): the one error family the executor itself raises,
/// distinct from the schema/storage/index errors its collaborators raise
/// (wrapped here so callers can match on a single type).
#[derive(Clone, Debug, PartialEq)]
pub enum ExecutionError {
    /// An `INSERT`/`UPDATE` would leave two live records sharing a primary
    /// key value.
    DuplicatePrimaryKey {
        /// The table being written to.
        table: String,
        /// The primary-key column.
        column: String,
        /// The offending value, rendered for display.
        value: String,
    },
    /// A foreign-key column's value does not match any live value of its
    /// referenced column.
    ForeignKeyTargetMissing {
        /// The table declaring the foreign key.
        table: String,
        /// The referencing column.
        column: String,
        /// The referenced table.
        ref_table: String,
        /// The referenced column.
        ref_column: String,
        /// The offending value, rendered for display.
        value: String,
    },
    /// A `DELETE` (or a DDL `DROP TABLE`) was refused because another
    /// table's foreign key still points at the row or table being removed.
    ReferentialIntegrity {
        /// The table being deleted from (or dropped).
        table: String,
        /// The table whose foreign key blocks the operation.
        referencing_table: String,
    },
    /// A `SchemaError` surfaced while executing (e.g. a catalog mutation
    /// failed after validation already passed, or `DROP TABLE`'s
    /// referential check raised it directly).
    Schema(SchemaError),
    /// A `StorageError` surfaced from the record-stream collaborator.
    Storage(StorageError),
    /// An `IndexError` surfaced from the index collaborator.
    Index(IndexError),
    /// A `ValidationError` surfaced while independently planning a nested
    /// subquery (a derived table or `IN (SELECT ...)`).
    Validation(ValidationError),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::DuplicatePrimaryKey { table, column, value } => write!(
                f,
                "duplicate primary key value {} for {}.{}",
                value, table, column
            ),
            ExecutionError::ForeignKeyTargetMissing {
                table,
                column,
                ref_table,
                ref_column,
                value,
            } => write!(
                f,
                "{}.{} = {} has no matching {}.{}",
                table, column, value, ref_table, ref_column
            ),
            ExecutionError::ReferentialIntegrity { table, referencing_table } => write!(
                f,
                "'{}' is still referenced by '{}'",
                table, referencing_table
            ),
            ExecutionError::Schema(e) => write!(f, "{}", e),
            ExecutionError::Storage(e) => write!(f, "{}", e),
            ExecutionError::Index(e) => write!(f, "{}", e),
            ExecutionError::Validation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ExecutionError {}

impl From<SchemaError> for ExecutionError {
    fn from(e: SchemaError) -> Self {
        ExecutionError::Schema(e)
    }
}

impl From<StorageError> for ExecutionError {
    fn from(e: StorageError) -> Self {
        ExecutionError::Storage(e)
    }
}

impl From<IndexError> for ExecutionError {
    fn from(e: IndexError) -> Self {
        ExecutionError::Index(e)
    }
}

impl From<ValidationError> for ExecutionError {
    fn from(e: ValidationError) -> Self {
        ExecutionError::Validation(e)
    }
}
