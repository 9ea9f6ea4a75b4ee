use tinysql_ast::{CreateIndexStmt, CreateTableStmt, DropIndexStmt, DropTableStmt, Value};
use tinysql_catalog::{Catalog, ForeignKeyRef, SchemaError, TableMeta};
use tinysql_storage::{Index, RecordStream, StorageEngine};

use crate::error::ExecutionError;

/// `CREATE TABLE` (`spec.md` §4.5): allocates catalog metadata and, if a
/// primary key was declared, its implicit index. Atomic at the catalog
/// level — [`Catalog::create_table`] either registers the whole table or
/// fails before touching anything.
pub(crate) fn create_table(stmt: &CreateTableStmt, catalog: &mut dyn Catalog) -> Result<String, ExecutionError> {
    let foreign_keys = stmt
        .foreign_keys
        .iter()
        .map(|fk| {
            (
                fk.column.clone(),
                ForeignKeyRef {
                    ref_table: fk.ref_table.clone(),
                    ref_column: fk.ref_column.clone(),
                },
            )
        })
        .collect();
    let meta = TableMeta::new(stmt.name.clone(), stmt.columns.clone(), foreign_keys);
    catalog.create_table(meta)?;
    tracing::info!(table = %stmt.name, "created table");
    Ok(format!("table '{}' created", stmt.name))
}

/// `DROP TABLE` (`spec.md` §4.5): refused while any other table's foreign
/// key still points at this one, otherwise tears down every index file,
/// the record file, and the catalog entry.
pub(crate) fn drop_table(
    stmt: &DropTableStmt,
    catalog: &mut dyn Catalog,
    storage: &StorageEngine,
) -> Result<String, ExecutionError> {
    let meta = catalog.table(&stmt.name)?.clone();
    if let Some(referencing) = catalog.tables_referencing(&stmt.name).first() {
        return Err(SchemaError::TableReferencedByForeignKey {
            table: stmt.name.clone(),
            referencing_table: referencing.name.clone(),
        }
        .into());
    }
    storage.drop_table_files(&stmt.name, &tinysql_catalog::indexed_columns(&meta))?;
    catalog.drop_table(&stmt.name)?;
    tracing::info!(table = %stmt.name, "dropped table");
    Ok(format!("table '{}' dropped", stmt.name))
}

/// `CREATE INDEX ON table (column)` (`spec.md` §4.5): rebuilds the index
/// from a full scan of the table's live records before registering it in
/// the catalog, so a reader never observes a catalog-visible index with
/// stale (or empty) contents.
pub(crate) fn create_index(
    stmt: &CreateIndexStmt,
    catalog: &mut dyn Catalog,
    storage: &StorageEngine,
) -> Result<String, ExecutionError> {
    let stream = storage.record_stream(&stmt.table);
    let entries: Vec<(Value, u64)> = stream
        .read_all()?
        .into_iter()
        .filter(|slot| slot.is_live)
        .filter_map(|slot| {
            let value = slot.get(&stmt.column);
            value.is_present().then_some((value, slot.slot_id))
        })
        .collect();
    let mut index = storage.index(&stmt.table, &stmt.column);
    index.rebuild(entries)?;
    catalog.create_index(&stmt.table, &stmt.column)?;
    tracing::info!(table = %stmt.table, column = %stmt.column, "created index");
    Ok(format!("index on '{}.{}' created", stmt.table, stmt.column))
}

/// `DROP INDEX ON table (column)` (`spec.md` §4.5). The primary-key index
/// is refused earlier, by the validator.
pub(crate) fn drop_index(
    stmt: &DropIndexStmt,
    catalog: &mut dyn Catalog,
    storage: &StorageEngine,
) -> Result<String, ExecutionError> {
    storage.drop_index_file(&stmt.table, &stmt.column)?;
    catalog.drop_index(&stmt.table, &stmt.column)?;
    tracing::info!(table = %stmt.table, column = %stmt.column, "dropped index");
    Ok(format!("index on '{}.{}' dropped", stmt.table, stmt.column))
}
