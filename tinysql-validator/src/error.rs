use std::fmt;

use tinysql_ast::DataType;

/// An error raised while checking a structurally well-formed AST against
/// the catalog (`spec.md` §4.3, §7). Always names the first offending
/// construct; the validator does not accumulate multiple errors.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationError {
    /// Two `FROM`/`JOIN` entries in one statement claim the same alias.
    DuplicateAlias(String),
    /// A qualified column reference's table alias is not in scope.
    UnknownTableAlias(String),
    /// A column reference does not name a column of its resolved table
    /// (or, unqualified, of any in-scope table).
    UnknownColumn {
        /// The alias it was qualified with, if any.
        qualifier: Option<String>,
        /// The column name that failed to resolve.
        column: String,
    },
    /// An unqualified column name matches more than one in-scope table.
    AmbiguousColumn(String),
    /// A statement names a table the catalog does not have.
    TableNotFound(String),
    /// `CREATE TABLE` declared the same column name twice.
    DuplicateColumnName {
        /// The table being created.
        table: String,
        /// The column name declared twice.
        column: String,
    },
    /// `PRIMARY KEY`/`AUTO_INCREMENT` named a column not in the column list.
    PrimaryKeyColumnNotDeclared {
        /// The table being created.
        table: String,
        /// The column name.
        column: String,
    },
    /// More than one column in a `CREATE TABLE` was marked `PRIMARY KEY`.
    MultiplePrimaryKeys(String),
    /// `AUTO_INCREMENT` was declared on a non-integer or non-primary-key column.
    AutoIncrementRequiresIntegerPrimaryKey {
        /// The table being created.
        table: String,
        /// The column name.
        column: String,
    },
    /// A `FOREIGN KEY` names a table the catalog does not have.
    ForeignKeyReferencedTableNotFound {
        /// The table declaring the foreign key.
        table: String,
        /// The table it references.
        ref_table: String,
    },
    /// A `FOREIGN KEY` names a column that is not its target's primary key.
    ForeignKeyReferencedColumnNotPrimaryKey {
        /// The referenced table.
        ref_table: String,
        /// The referenced column.
        ref_column: String,
    },
    /// A literal's type does not agree with its target column's type.
    TypeMismatch {
        /// The column being assigned.
        column: String,
        /// The column's declared type.
        expected: DataType,
        /// The literal's type.
        found: DataType,
    },
    /// `INSERT`'s value list and column list (explicit or positional) are
    /// different lengths.
    ColumnCountMismatch {
        /// The table being inserted into.
        table: String,
        /// Number of columns expected.
        expected: usize,
        /// Number of values given.
        found: usize,
    },
    /// `INSERT`/`UPDATE` names a column that does not exist on the table.
    UnknownColumnInTable {
        /// The table.
        table: String,
        /// The column name.
        column: String,
    },
    /// `CREATE INDEX` named a column already carrying an index.
    IndexAlreadyExists {
        /// The table.
        table: String,
        /// The column.
        column: String,
    },
    /// `DROP INDEX` named a column with no index.
    IndexNotFound {
        /// The table.
        table: String,
        /// The column.
        column: String,
    },
    /// `DROP INDEX` was asked to drop the primary-key index.
    CannotDropPrimaryKeyIndex {
        /// The table.
        table: String,
        /// The column.
        column: String,
    },
    /// A derived table in `FROM` was not given an alias.
    DerivedTableRequiresAlias,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateAlias(alias) => {
                write!(f, "duplicate table alias '{}'", alias)
            }
            ValidationError::UnknownTableAlias(alias) => {
                write!(f, "unknown table alias '{}'", alias)
            }
            ValidationError::UnknownColumn { qualifier: Some(q), column } => {
                write!(f, "unknown column '{}.{}'", q, column)
            }
            ValidationError::UnknownColumn { qualifier: None, column } => {
                write!(f, "unknown column '{}'", column)
            }
            ValidationError::AmbiguousColumn(column) => {
                write!(f, "ambiguous column reference '{}'", column)
            }
            ValidationError::TableNotFound(name) => write!(f, "no such table '{}'", name),
            ValidationError::DuplicateColumnName { table, column } => write!(
                f,
                "table '{}' declares column '{}' more than once",
                table, column
            ),
            ValidationError::PrimaryKeyColumnNotDeclared { table, column } => write!(
                f,
                "'{}' names undeclared column '{}' as primary key",
                table, column
            ),
            ValidationError::MultiplePrimaryKeys(table) => {
                write!(f, "table '{}' declares more than one primary key", table)
            }
            ValidationError::AutoIncrementRequiresIntegerPrimaryKey { table, column } => write!(
                f,
                "'{}.{}' is AUTO_INCREMENT but is not an integer primary key",
                table, column
            ),
            ValidationError::ForeignKeyReferencedTableNotFound { table, ref_table } => write!(
                f,
                "table '{}' declares a foreign key to nonexistent table '{}'",
                table, ref_table
            ),
            ValidationError::ForeignKeyReferencedColumnNotPrimaryKey { ref_table, ref_column } => {
                write!(f, "'{}' is not the primary key of '{}'", ref_column, ref_table)
            }
            ValidationError::TypeMismatch { column, expected, found } => write!(
                f,
                "column '{}' expects {} but got {}",
                column, expected, found
            ),
            ValidationError::ColumnCountMismatch { table, expected, found } => write!(
                f,
                "'{}' expects {} value(s) but got {}",
                table, expected, found
            ),
            ValidationError::UnknownColumnInTable { table, column } => {
                write!(f, "table '{}' has no column '{}'", table, column)
            }
            ValidationError::IndexAlreadyExists { table, column } => {
                write!(f, "an index on {}.{} already exists", table, column)
            }
            ValidationError::IndexNotFound { table, column } => {
                write!(f, "no index on {}.{}", table, column)
            }
            ValidationError::CannotDropPrimaryKeyIndex { table, column } => write!(
                f,
                "cannot drop the primary key index on {}.{}",
                table, column
            ),
            ValidationError::DerivedTableRequiresAlias => {
                f.write_str("a derived table requires an alias")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
