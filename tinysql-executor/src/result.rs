/// What running a statement produced (`spec.md` §4.5): either a tabular
/// result set (`SELECT`, `SHOW TABLES`, `DESCRIBE`) or a human-readable
/// confirmation message (DDL and DML).
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// A tabular result.
    Rows(ResultSet),
    /// A confirmation message, e.g. `"1 record(s) inserted"`.
    Message(String),
}

/// A tabular result: column headers and rendered cell values, in row-major
/// order. Every cell is already formatted for display (`NULL` for an
/// absent value), matching the shape described in `spec.md` §4.5.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ResultSet {
    /// Column headers, in projection order.
    pub columns: Vec<String>,
    /// Rows, each aligned with `columns`.
    pub rows: Vec<Vec<String>>,
}
