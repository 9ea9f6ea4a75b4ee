use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tinysql_ast::ColumnDef;

use crate::table::{ForeignKeyRef, TableMeta};

/// A table's name and record count, as persisted in the `tables` mapping
/// (`spec.md` §6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableEntry {
    /// The table name.
    pub name: String,
    /// Number of live records at the time of the last save.
    pub record_count: u64,
}

/// The logical catalog document (`spec.md` §6): four top-level mappings,
/// kept as separate fields so each round-trips independently, matching the
/// source's own table-oriented persistence split.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// `name -> { name, record_count }`.
    pub tables: HashMap<String, TableEntry>,
    /// `name -> ordered column list`.
    pub columns: HashMap<String, Vec<ColumnDef>>,
    /// `table name -> set of indexed column names`.
    pub indexes: HashMap<String, Vec<String>>,
    /// `table name -> primary key column`.
    pub primary_keys: HashMap<String, String>,
    /// `table name -> (column -> { table, column })`.
    pub foreign_keys: HashMap<String, HashMap<String, ForeignKeyRef>>,
}

impl CatalogDocument {
    /// Flattens a `name -> TableMeta` map into the four-mapping document
    /// layout the spec's persisted-state contract names.
    pub fn from_tables(tables: &HashMap<String, TableMeta>) -> Self {
        let mut doc = CatalogDocument::default();
        for (name, meta) in tables {
            doc.tables.insert(
                name.clone(),
                TableEntry {
                    name: meta.name.clone(),
                    record_count: meta.record_count,
                },
            );
            doc.columns.insert(name.clone(), meta.columns.clone());
            let mut indexed: Vec<String> = meta.indexes.iter().cloned().collect();
            indexed.sort();
            doc.indexes.insert(name.clone(), indexed);
            if let Some(pk) = &meta.primary_key {
                doc.primary_keys.insert(name.clone(), pk.clone());
            }
            doc.foreign_keys.insert(name.clone(), meta.foreign_keys.clone());
        }
        doc
    }

    /// Rebuilds the in-memory `name -> TableMeta` map from the document.
    pub fn into_tables(self) -> HashMap<String, TableMeta> {
        let mut out = HashMap::new();
        for (name, entry) in self.tables {
            let columns = self.columns.get(&name).cloned().unwrap_or_default();
            let primary_key = self.primary_keys.get(&name).cloned();
            let foreign_keys = self.foreign_keys.get(&name).cloned().unwrap_or_default();
            let indexes = self
                .indexes
                .get(&name)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .collect();
            out.insert(
                name.clone(),
                TableMeta {
                    name,
                    columns,
                    primary_key,
                    foreign_keys,
                    indexes,
                    record_count: entry.record_count,
                },
            );
        }
        out
    }
}
