use std::fmt;

use tinysql_catalog::SchemaError;
use tinysql_executor::ExecutionError;
use tinysql_parser::ParseError;
use tinysql_storage::{IndexError, StorageError};
use tinysql_validator::ValidationError;

/// The single error type a [`crate::Database`] ever returns (`spec.md`
/// §7: "all concrete errors are a subtype of a single base... so callers
/// can catch broadly or narrowly"). Every stage of the pipeline —
/// lex/parse, validate, execute — wraps its own error family into one of
/// these variants; matching on the variant recovers which stage failed,
/// matching on `DbmsError` alone is enough to just log and move on.
#[derive(Clone, Debug, PartialEq)]
pub enum DbmsError {
    /// Lexing or parsing the statement text failed.
    Parse(ParseError),
    /// The parsed statement failed validation against the catalog.
    Validation(ValidationError),
    /// A validated, optimized statement failed while running.
    Execution(ExecutionError),
    /// The catalog itself could not be loaded or flushed.
    Schema(SchemaError),
    /// A record stream could not be read or written (only reachable
    /// outside statement execution, e.g. during [`crate::Database::vacuum`];
    /// the executor wraps the same error inside [`ExecutionError`]).
    Storage(StorageError),
    /// An index could not be read or written (see [`DbmsError::Storage`]).
    Index(IndexError),
}

impl fmt::Display for DbmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbmsError::Parse(e) => write!(f, "{}", e),
            DbmsError::Validation(e) => write!(f, "{}", e),
            DbmsError::Execution(e) => write!(f, "{}", e),
            DbmsError::Schema(e) => write!(f, "{}", e),
            DbmsError::Storage(e) => write!(f, "{}", e),
            DbmsError::Index(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DbmsError {}

impl From<ParseError> for DbmsError {
    fn from(e: ParseError) -> Self {
        DbmsError::Parse(e)
    }
}

impl From<ValidationError> for DbmsError {
    fn from(e: ValidationError) -> Self {
        DbmsError::Validation(e)
    }
}

impl From<ExecutionError> for DbmsError {
    fn from(e: ExecutionError) -> Self {
        DbmsError::Execution(e)
    }
}

impl From<SchemaError> for DbmsError {
    fn from(e: SchemaError) -> Self {
        DbmsError::Schema(e)
    }
}

impl From<StorageError> for DbmsError {
    fn from(e: StorageError) -> Self {
        DbmsError::Storage(e)
    }
}

impl From<IndexError> for DbmsError {
    fn from(e: IndexError) -> Self {
        DbmsError::Index(e)
    }
}
