use std::collections::HashMap;

use tinysql_ast::Value;

/// A single row flowing through a `SELECT` pipeline: cell values keyed
/// `"alias.column"`, plus the physical slot id each contributing alias's
/// record came from. `slots` lets an index-nested-loop join correlate a
/// base table's physical index lookup back into a row that may already
/// span several earlier joins (`spec.md` §4.5's join algorithms).
#[derive(Clone, Debug, Default)]
pub struct Row {
    /// Cell values, keyed `"alias.column"`.
    pub values: HashMap<String, Value>,
    /// The slot id each alias's live record occupies, keyed by alias.
    /// Empty for rows sourced from a derived table (there is no single
    /// physical slot to correlate against).
    pub slots: HashMap<String, u64>,
}

impl Row {
    /// Reads a cell, treating a missing key the same as [`Value::Absent`].
    pub fn get(&self, alias: &str, column: &str) -> Value {
        self.values
            .get(&format!("{alias}.{column}"))
            .cloned()
            .unwrap_or(Value::Absent)
    }

    /// Combines two rows from different aliases into one, as a join edge
    /// does. Panics in debug builds would be wrong here too: overlapping
    /// keys can't occur because every alias appears in exactly one side
    /// of a join edge.
    pub fn merge(&self, other: &Row) -> Row {
        let mut values = self.values.clone();
        values.extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        let mut slots = self.slots.clone();
        slots.extend(other.slots.iter().map(|(k, v)| (k.clone(), *v)));
        Row { values, slots }
    }
}
