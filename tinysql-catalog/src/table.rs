use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tinysql_ast::ColumnDef;

/// The target of a `FOREIGN KEY` constraint (`spec.md` §3).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// The table the foreign key points at.
    pub ref_table: String,
    /// The column it points at, always that table's primary key.
    pub ref_column: String,
}

/// A table's full metadata (`spec.md` §3): the unit of truth the catalog
/// owns and the validator/optimizer/executor read through `&dyn Catalog`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableMeta {
    /// The table name.
    pub name: String,
    /// Column declarations, in source order; names are unique within a table.
    pub columns: Vec<ColumnDef>,
    /// The primary key column, if one was declared.
    pub primary_key: Option<String>,
    /// Foreign keys, keyed by the referencing column.
    pub foreign_keys: HashMap<String, ForeignKeyRef>,
    /// Columns with a secondary (or primary-key) index.
    pub indexes: HashSet<String>,
    /// Number of live records, maintained by the executor.
    pub record_count: u64,
}

impl TableMeta {
    /// Builds a fresh, empty `TableMeta` from a parsed `CREATE TABLE` body.
    /// Does not itself create the implicit primary-key index; callers
    /// (the catalog) are responsible for that (`spec.md` §3).
    pub fn new(
        name: impl Into<String>,
        columns: Vec<ColumnDef>,
        foreign_keys: HashMap<String, ForeignKeyRef>,
    ) -> Self {
        let primary_key = columns
            .iter()
            .find(|c| c.is_primary_key)
            .map(|c| c.name.clone());
        let mut indexes = HashSet::new();
        if let Some(pk) = &primary_key {
            indexes.insert(pk.clone());
        }
        Self {
            name: name.into(),
            columns,
            primary_key,
            foreign_keys,
            indexes,
            record_count: 0,
        }
    }

    /// The column definition named `name`, if one exists.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// True if this table has a column named `name`.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// True if `column` carries a secondary or primary-key index.
    pub fn is_indexed(&self, column: &str) -> bool {
        self.indexes.contains(column)
    }

    /// The foreign key declared on `column`, if any.
    pub fn foreign_key(&self, column: &str) -> Option<&ForeignKeyRef> {
        self.foreign_keys.get(column)
    }
}
