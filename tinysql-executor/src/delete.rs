use std::collections::HashMap;

use tinysql_ast::DeleteStmt;
use tinysql_catalog::Catalog;
use tinysql_storage::{Index, RecordStream, Slot, StorageEngine};

use crate::error::ExecutionError;
use crate::eval;
use crate::row::Row;

fn row_for(table: &str, slot: &Slot) -> Row {
    let mut values = HashMap::new();
    for (column, value) in &slot.record {
        values.insert(format!("{table}.{column}"), value.clone());
    }
    let mut slots = HashMap::new();
    slots.insert(table.to_string(), slot.slot_id);
    Row { values, slots }
}

/// Runs `DELETE FROM table [WHERE ...]` (`spec.md` §4.5). Referential
/// integrity is checked for every matching row *before* any tombstone is
/// written: if any other table's foreign key still points at one of them,
/// the whole statement aborts with no partial effect.
pub(crate) fn execute(
    stmt: &DeleteStmt,
    catalog: &mut dyn Catalog,
    storage: &StorageEngine,
) -> Result<String, ExecutionError> {
    let meta = catalog.table(&stmt.table)?.clone();
    let referencing_tables: Vec<_> = catalog
        .tables_referencing(&stmt.table)
        .into_iter()
        .cloned()
        .collect();

    let stream = storage.record_stream(&stmt.table);
    let slots = stream.read_all()?;

    let mut matched = Vec::new();
    for slot in slots.into_iter().filter(|s| s.is_live) {
        let row = row_for(&stmt.table, &slot);
        let keep = match &stmt.filter {
            Some(filter) => eval::eval_condition(filter, &row, &*catalog, storage)?,
            None => true,
        };
        if keep {
            matched.push(slot);
        }
    }

    if let Some(pk_column) = &meta.primary_key {
        for slot in &matched {
            let pk_value = slot.get(pk_column);
            if !pk_value.is_present() {
                continue;
            }
            for referencing in &referencing_tables {
                for (fk_column, fk) in &referencing.foreign_keys {
                    if fk.ref_table != stmt.table || fk.ref_column != *pk_column {
                        continue;
                    }
                    let other = storage.record_stream(&referencing.name);
                    let still_referenced = other
                        .read_all()?
                        .into_iter()
                        .any(|s| s.is_live && s.get(fk_column) == pk_value);
                    if still_referenced {
                        return Err(ExecutionError::ReferentialIntegrity {
                            table: stmt.table.clone(),
                            referencing_table: referencing.name.clone(),
                        });
                    }
                }
            }
        }
    }

    let mut stream = storage.record_stream(&stmt.table);
    for slot in &matched {
        for column in &meta.indexes {
            let value = slot.get(column);
            if value.is_present() {
                storage.index(&stmt.table, column).remove(&value, slot.slot_id)?;
            }
        }
        stream.soft_delete(slot.slot_id)?;
    }

    let deleted = matched.len() as u64;
    catalog.set_record_count(&stmt.table, meta.record_count.saturating_sub(deleted))?;
    tracing::debug!(table = %stmt.table, deleted, "deleted records");
    Ok(format!("{} record(s) deleted", deleted))
}
