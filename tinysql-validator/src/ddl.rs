use std::collections::HashSet;

use tinysql_ast::{CreateIndexStmt, CreateTableStmt, DataType, DropIndexStmt, DropTableStmt};
use tinysql_catalog::Catalog;

use crate::error::ValidationError;

/// Validates `CREATE TABLE` (`spec.md` §4.3 item 3, §3's column/FK rules)
/// against the catalog as it stands *before* this statement is applied.
pub fn validate_create_table(
    stmt: &CreateTableStmt,
    catalog: &dyn Catalog,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for col in &stmt.columns {
        if !seen.insert(col.name.as_str()) {
            return Err(ValidationError::DuplicateColumnName {
                table: stmt.name.clone(),
                column: col.name.clone(),
            });
        }
    }

    let primary_keys: Vec<_> = stmt.columns.iter().filter(|c| c.is_primary_key).collect();
    if primary_keys.len() > 1 {
        return Err(ValidationError::MultiplePrimaryKeys(stmt.name.clone()));
    }
    for col in &stmt.columns {
        if col.is_auto_increment && !(col.is_primary_key && col.data_type == DataType::Int) {
            return Err(ValidationError::AutoIncrementRequiresIntegerPrimaryKey {
                table: stmt.name.clone(),
                column: col.name.clone(),
            });
        }
    }

    for fk in &stmt.foreign_keys {
        if !stmt.columns.iter().any(|c| c.name == fk.column) {
            return Err(ValidationError::PrimaryKeyColumnNotDeclared {
                table: stmt.name.clone(),
                column: fk.column.clone(),
            });
        }
        let ref_meta = catalog.table(&fk.ref_table).map_err(|_| {
            ValidationError::ForeignKeyReferencedTableNotFound {
                table: stmt.name.clone(),
                ref_table: fk.ref_table.clone(),
            }
        })?;
        if ref_meta.primary_key.as_deref() != Some(fk.ref_column.as_str()) {
            return Err(ValidationError::ForeignKeyReferencedColumnNotPrimaryKey {
                ref_table: fk.ref_table.clone(),
                ref_column: fk.ref_column.clone(),
            });
        }
    }

    Ok(())
}

/// Validates `DROP TABLE` (`spec.md` §4.3 item 3): only that the table
/// exists. Whether another table's foreign key still references it is a
/// whole-catalog integrity concern the executor raises as a
/// [`tinysql_catalog::SchemaError`], not here (`spec.md` §4.5, §7).
pub fn validate_drop_table(stmt: &DropTableStmt, catalog: &dyn Catalog) -> Result<(), ValidationError> {
    if !catalog.table_exists(&stmt.name) {
        return Err(ValidationError::TableNotFound(stmt.name.clone()));
    }
    Ok(())
}

/// Validates `CREATE INDEX` (`spec.md` §4.3 item 3).
pub fn validate_create_index(
    stmt: &CreateIndexStmt,
    catalog: &dyn Catalog,
) -> Result<(), ValidationError> {
    let meta = catalog
        .table(&stmt.table)
        .map_err(|_| ValidationError::TableNotFound(stmt.table.clone()))?;
    if !meta.has_column(&stmt.column) {
        return Err(ValidationError::UnknownColumnInTable {
            table: stmt.table.clone(),
            column: stmt.column.clone(),
        });
    }
    if meta.is_indexed(&stmt.column) {
        return Err(ValidationError::IndexAlreadyExists {
            table: stmt.table.clone(),
            column: stmt.column.clone(),
        });
    }
    Ok(())
}

/// Validates `DROP INDEX` (`spec.md` §4.3 item 3).
pub fn validate_drop_index(stmt: &DropIndexStmt, catalog: &dyn Catalog) -> Result<(), ValidationError> {
    let meta = catalog
        .table(&stmt.table)
        .map_err(|_| ValidationError::TableNotFound(stmt.table.clone()))?;
    if !meta.is_indexed(&stmt.column) {
        return Err(ValidationError::IndexNotFound {
            table: stmt.table.clone(),
            column: stmt.column.clone(),
        });
    }
    if meta.primary_key.as_deref() == Some(stmt.column.as_str()) {
        return Err(ValidationError::CannotDropPrimaryKeyIndex {
            table: stmt.table.clone(),
            column: stmt.column.clone(),
        });
    }
    Ok(())
}
