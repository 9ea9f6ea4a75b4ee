use tinysql_ast::{Condition, DataType, DeleteStmt, Expr, InsertStmt, QualifiedName, UpdateStmt};
use tinysql_catalog::{Catalog, TableMeta};

use crate::error::ValidationError;

/// The declared type of a literal, or `None` for a non-literal expression
/// (the grammar only produces literals in `VALUES`/`SET`, so this is
/// exhaustive in practice).
fn literal_type(expr: &Expr) -> Option<DataType> {
    match expr {
        Expr::IntLit(_) => Some(DataType::Int),
        Expr::StrLit(_) => Some(DataType::Str),
        Expr::Column(_) | Expr::Aggregate(_) => None,
    }
}

fn check_assignment_type(column: &str, expected: DataType, value: &Expr) -> Result<(), ValidationError> {
    if let Some(found) = literal_type(value) {
        if found != expected {
            return Err(ValidationError::TypeMismatch {
                column: column.to_string(),
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// Resolves a column reference inside an `UPDATE`/`DELETE` `WHERE` clause,
/// where there is exactly one table in scope and no alias map (`spec.md`
/// §4.3 item 2 degenerates to a single-table check here).
fn resolve_single_table_column(meta: &TableMeta, name: &QualifiedName) -> Result<(), ValidationError> {
    if let Some(qualifier) = &name.qualifier {
        if qualifier != &meta.name {
            return Err(ValidationError::UnknownTableAlias(qualifier.clone()));
        }
    }
    if meta.has_column(&name.name) {
        Ok(())
    } else {
        Err(ValidationError::UnknownColumn {
            qualifier: name.qualifier.clone(),
            column: name.name.clone(),
        })
    }
}

fn resolve_single_table_expr(meta: &TableMeta, expr: &Expr) -> Result<(), ValidationError> {
    match expr {
        Expr::Column(col) => resolve_single_table_column(meta, col),
        Expr::IntLit(_) | Expr::StrLit(_) => Ok(()),
        Expr::Aggregate(agg) => match &agg.arg {
            tinysql_ast::AggregateArg::Star => Ok(()),
            tinysql_ast::AggregateArg::Column(col) => resolve_single_table_column(meta, col),
        },
    }
}

fn resolve_single_table_condition(meta: &TableMeta, cond: &Condition) -> Result<(), ValidationError> {
    match cond {
        Condition::Comparison(l, _, r) => {
            resolve_single_table_expr(meta, l)?;
            resolve_single_table_expr(meta, r)
        }
        Condition::And(l, r) | Condition::Or(l, r) => {
            resolve_single_table_condition(meta, l)?;
            resolve_single_table_condition(meta, r)
        }
        Condition::InSubquery(expr, select) => {
            resolve_single_table_expr(meta, expr)?;
            crate::select::validate_select(select, &NoopCatalog(meta)).map(|_| ())
        }
    }
}

/// A single-table stand-in used only to let an `IN (SELECT ...)` subquery
/// inside an `UPDATE`/`DELETE` filter resolve through the normal
/// [`validate_select`](crate::select::validate_select) path; the subquery
/// itself still resolves against the real catalog via its own `FROM`.
struct NoopCatalog<'a>(&'a TableMeta);

impl Catalog for NoopCatalog<'_> {
    fn table(&self, name: &str) -> Result<&TableMeta, tinysql_catalog::SchemaError> {
        if name == self.0.name {
            Ok(self.0)
        } else {
            Err(tinysql_catalog::SchemaError::TableNotFound(name.to_string()))
        }
    }

    fn tables(&self) -> Vec<&TableMeta> {
        vec![self.0]
    }

    fn create_table(&mut self, _meta: TableMeta) -> Result<(), tinysql_catalog::SchemaError> {
        unreachable!("validation never mutates the catalog")
    }

    fn drop_table(&mut self, _name: &str) -> Result<(), tinysql_catalog::SchemaError> {
        unreachable!("validation never mutates the catalog")
    }

    fn create_index(&mut self, _table: &str, _column: &str) -> Result<(), tinysql_catalog::SchemaError> {
        unreachable!("validation never mutates the catalog")
    }

    fn drop_index(&mut self, _table: &str, _column: &str) -> Result<(), tinysql_catalog::SchemaError> {
        unreachable!("validation never mutates the catalog")
    }

    fn set_record_count(&mut self, _table: &str, _count: u64) -> Result<(), tinysql_catalog::SchemaError> {
        unreachable!("validation never mutates the catalog")
    }
}

/// Validates `INSERT` (`spec.md` §4.3 item 4): the column list (explicit
/// or positional) and value list agree in length, every named column
/// exists, and every literal's type agrees with its column's declared type.
pub fn validate_insert(stmt: &InsertStmt, catalog: &dyn Catalog) -> Result<(), ValidationError> {
    let meta = catalog
        .table(&stmt.table)
        .map_err(|_| ValidationError::TableNotFound(stmt.table.clone()))?;

    let columns: Vec<&str> = match &stmt.columns {
        Some(cols) => cols.iter().map(|c| c.as_str()).collect(),
        None => meta.columns.iter().map(|c| c.name.as_str()).collect(),
    };

    if columns.len() != stmt.values.len() {
        return Err(ValidationError::ColumnCountMismatch {
            table: stmt.table.clone(),
            expected: columns.len(),
            found: stmt.values.len(),
        });
    }

    for (column, value) in columns.iter().zip(stmt.values.iter()) {
        let col_def = meta.column(column).ok_or_else(|| ValidationError::UnknownColumnInTable {
            table: stmt.table.clone(),
            column: column.to_string(),
        })?;
        check_assignment_type(column, col_def.data_type, value)?;
    }

    Ok(())
}

/// Validates `UPDATE` (`spec.md` §4.3 item 4): every assigned column
/// exists and type-agrees, and the `WHERE` clause resolves against the
/// single target table.
pub fn validate_update(stmt: &UpdateStmt, catalog: &dyn Catalog) -> Result<(), ValidationError> {
    let meta = catalog
        .table(&stmt.table)
        .map_err(|_| ValidationError::TableNotFound(stmt.table.clone()))?;

    for (column, value) in &stmt.assignments {
        let col_def = meta.column(column).ok_or_else(|| ValidationError::UnknownColumnInTable {
            table: stmt.table.clone(),
            column: column.clone(),
        })?;
        check_assignment_type(column, col_def.data_type, value)?;
    }

    if let Some(filter) = &stmt.filter {
        resolve_single_table_condition(meta, filter)?;
    }

    Ok(())
}

/// Validates `DELETE` (`spec.md` §4.3 item 4): the `WHERE` clause resolves
/// against the single target table.
pub fn validate_delete(stmt: &DeleteStmt, catalog: &dyn Catalog) -> Result<(), ValidationError> {
    let meta = catalog
        .table(&stmt.table)
        .map_err(|_| ValidationError::TableNotFound(stmt.table.clone()))?;

    if let Some(filter) = &stmt.filter {
        resolve_single_table_condition(meta, filter)?;
    }

    Ok(())
}
