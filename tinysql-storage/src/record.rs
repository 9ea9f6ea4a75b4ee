use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tinysql_ast::Value;

/// A mapping from column name to scalar value (`spec.md` §3). Absent
/// columns are simply absent keys; callers needing the tagged
/// [`Value::Absent`] form should use [`Slot::get`].
pub type Record = HashMap<String, Value>;

/// A record plus its storage-layer metadata (`spec.md` §9: the internal
/// `__id__`/`__deleted__` fields, "exposed via the storage interface as
/// `slot_id` and `is_live`, not by magic field names on user-visible
/// records").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Stable within the table's lifetime; the record's position in its
    /// stream (`spec.md` §3's "Slot id").
    pub slot_id: u64,
    /// `false` once the record has been soft-deleted (`spec.md` §3's
    /// "Tombstone"); a dead slot still occupies its position.
    pub is_live: bool,
    /// The record's column values.
    pub record: Record,
}

impl Slot {
    /// The value of `column`, or [`Value::Absent`] if the column was never
    /// set on this record.
    pub fn get(&self, column: &str) -> Value {
        self.record.get(column).cloned().unwrap_or(Value::Absent)
    }
}
