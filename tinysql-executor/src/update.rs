use std::collections::HashMap;

use tinysql_ast::{UpdateStmt, Value};
use tinysql_catalog::{Catalog, TableMeta};
use tinysql_storage::{Index, RecordStream, Slot, StorageEngine};

use crate::error::ExecutionError;
use crate::eval::{self, literal_value};
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

fn foreign_key_target_exists(
    storage: &StorageEngine,
    ref_meta: &TableMeta,
    ref_column: &str,
    value: &Value,
) -> Result<bool, ExecutionError> {
    if ref_meta.is_indexed(ref_column) {
        let index = storage.index(&ref_meta.name, ref_column);
        return Ok(!index.lookup(value)?.is_empty());
    }
    let stream = storage.record_stream(&ref_meta.name);
    Ok(stream
        .read_all()?
        .into_iter()
        .any(|slot| slot.is_live && &slot.get(ref_column) == value))
}

/// Runs `UPDATE table SET ... [WHERE ...]` (`spec.md` §4.5): applies the
/// `SET` list to every matching live row, re-checking primary-key
/// uniqueness (excluding the row itself) and foreign-key targets only for
/// the columns actually assigned, then writes each row back in place and
/// transitions its affected indexes from the old value to the new one.
pub(crate) fn execute(
    stmt: &UpdateStmt,
    catalog: &mut dyn Catalog,
    storage: &StorageEngine,
) -> Result<String, ExecutionError> {
    let meta = catalog.table(&stmt.table)?.clone();
    let stream = storage.record_stream(&stmt.table);
    let slots = stream.read_all()?;

    let mut updated = 0u64;
    for slot in slots.into_iter().filter(|s| s.is_live) {
        let row = row_for(&stmt.table, &slot);
        if let Some(filter) = &stmt.filter {
            if !eval::eval_condition(filter, &row, &*catalog, storage)? {
                continue;
            }
        }

        let mut new_record = slot.record.clone();
        for (column, expr) in &stmt.assignments {
            new_record.insert(column.clone(), literal_value(expr));
        }

        for (column, _) in &stmt.assignments {
            if meta.primary_key.as_deref() == Some(column.as_str()) {
                let new_value = new_record.get(column).cloned().unwrap_or(Value::Absent);
                if new_value.is_present() {
                    let index = storage.index(&stmt.table, column);
                    let clashes = index
                        .lookup(&new_value)?
                        .into_iter()
                        .any(|id| id != slot.slot_id);
                    if clashes {
                        return Err(ExecutionError::DuplicatePrimaryKey {
                            table: stmt.table.clone(),
                            column: column.clone(),
                            value: new_value.display_or_null(),
                        });
                    }
                }
            }
            if let Some(fk) = meta.foreign_key(column) {
                let new_value = new_record.get(column).cloned().unwrap_or(Value::Absent);
                if new_value.is_present() {
                    let ref_meta = catalog.table(&fk.ref_table)?.clone();
                    if !foreign_key_target_exists(storage, &ref_meta, &fk.ref_column, &new_value)? {
                        return Err(ExecutionError::ForeignKeyTargetMissing {
                            table: stmt.table.clone(),
                            column: column.clone(),
                            ref_table: fk.ref_table.clone(),
                            ref_column: fk.ref_column.clone(),
                            value: new_value.display_or_null(),
                        });
                    }
                }
            }
        }

        let mut stream = storage.record_stream(&stmt.table);
        stream.update(slot.slot_id, new_record.clone())?;

        for (column, _) in &stmt.assignments {
            if !meta.is_indexed(column) {
                continue;
            }
            let old_value = slot.get(column);
            let new_value = new_record.get(column).cloned().unwrap_or(Value::Absent);
            if old_value == new_value {
                continue;
            }
            let mut index = storage.index(&stmt.table, column);
            if old_value.is_present() {
                index.remove(&old_value, slot.slot_id)?;
            }
            if new_value.is_present() {
                index.insert(new_value, slot.slot_id)?;
            }
        }

        updated += 1;
    }

    tracing::debug!(table = %stmt.table, updated, "updated records");
    Ok(format!("{} record(s) updated", updated))
}
