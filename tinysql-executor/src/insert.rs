use std::collections::HashMap;

use tinysql_ast::{InsertStmt, Value};
use tinysql_catalog::{Catalog, TableMeta};
use tinysql_storage::{Index, RecordStream, StorageEngine};

use crate::error::ExecutionError;
use crate::eval::literal_value;

/// Builds the full column -> value map for one `INSERT`, from either the
/// explicit column list or the table's declared column order (`spec.md`
/// §4.5). Columns not named by this statement are simply absent from the
/// returned map.
fn build_record(meta: &TableMeta, stmt: &InsertStmt) -> HashMap<String, Value> {
    let columns: Vec<&str> = match &stmt.columns {
        Some(cols) => cols.iter().map(|c| c.as_str()).collect(),
        None => meta.columns.iter().map(|c| c.name.as_str()).collect(),
    };
    columns
        .into_iter()
        .zip(stmt.values.iter())
        .map(|(col, expr)| (col.to_string(), literal_value(expr)))
        .collect()
}

/// The next auto-assigned primary-key value: `max(existing) + 1`, starting
/// at 1 for an empty table (`spec.md` §4.5). Read from the primary-key
/// index, which every table with a primary key always carries.
fn next_pk_value(storage: &StorageEngine, table: &str, pk_column: &str) -> Result<i64, ExecutionError> {
    let index = storage.index(table, pk_column);
    let max = index
        .all_entries()?
        .into_iter()
        .filter_map(|(key, _)| match key {
            Value::Int(n) => Some(n),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    Ok(max + 1)
}

/// True if a provided primary-key value should be replaced by an
/// auto-assigned one: missing, or present-but-zero (`spec.md` §4.5 — this
/// applies whether or not `AUTO_INCREMENT` was declared).
fn needs_auto_assign(value: &Value) -> bool {
    matches!(value, Value::Absent | Value::Int(0))
}

/// Checks that `value` (a foreign-key column's value on the row being
/// written) matches some live value of the referenced column, via the
/// referenced column's index when one exists, otherwise a full scan.
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

/// Runs `INSERT INTO table [(cols)] VALUES (...)` (`spec.md` §4.5):
/// resolves the row, auto-assigns an absent/zero integer primary key,
/// enforces primary-key uniqueness and foreign-key existence, then writes
/// the record and updates every index whose column was set.
pub(crate) fn execute(
    stmt: &InsertStmt,
    catalog: &mut dyn Catalog,
    storage: &StorageEngine,
) -> Result<String, ExecutionError> {
    let meta = catalog.table(&stmt.table)?.clone();
    let mut record = build_record(&meta, stmt);

    if let Some(pk_column) = &meta.primary_key {
        if meta.column(pk_column).map(|c| c.data_type) == Some(tinysql_ast::DataType::Int) {
            let current = record.get(pk_column).cloned().unwrap_or(Value::Absent);
            if needs_auto_assign(&current) {
                let assigned = next_pk_value(storage, &stmt.table, pk_column)?;
                record.insert(pk_column.clone(), Value::Int(assigned));
            }
        }
    }

    if let Some(pk_column) = &meta.primary_key {
        let pk_value = record.get(pk_column).cloned().unwrap_or(Value::Absent);
        if pk_value.is_present() {
            let index = storage.index(&stmt.table, pk_column);
            if !index.lookup(&pk_value)?.is_empty() {
                return Err(ExecutionError::DuplicatePrimaryKey {
                    table: stmt.table.clone(),
                    column: pk_column.clone(),
                    value: pk_value.display_or_null(),
                });
            }
        }
    }

    for (column, fk) in &meta.foreign_keys {
        let value = record.get(column).cloned().unwrap_or(Value::Absent);
        if !value.is_present() {
            continue;
        }
        let ref_meta = catalog.table(&fk.ref_table)?.clone();
        if !foreign_key_target_exists(storage, &ref_meta, &fk.ref_column, &value)? {
            return Err(ExecutionError::ForeignKeyTargetMissing {
                table: stmt.table.clone(),
                column: column.clone(),
                ref_table: fk.ref_table.clone(),
                ref_column: fk.ref_column.clone(),
                value: value.display_or_null(),
            });
        }
    }

    let mut stream = storage.record_stream(&stmt.table);
    let slot_id = stream.append(record.clone())?;

    for column in &meta.indexes {
        let value = record.get(column).cloned().unwrap_or(Value::Absent);
        if value.is_present() {
            storage.index(&stmt.table, column).insert(value, slot_id)?;
        }
    }

    catalog.set_record_count(&stmt.table, meta.record_count + 1)?;
    tracing::debug!(table = %stmt.table, slot_id, "inserted record");
    Ok("1 record(s) inserted".to_string())
}
