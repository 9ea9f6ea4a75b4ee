//! # tinysql-validator
//!
//! Checks a parsed [`Statement`] against the catalog (`spec.md` §4.3):
//! every table/column reference resolves, `CREATE TABLE`'s column and
//! foreign-key declarations are internally consistent, and `INSERT`/
//! `UPDATE` literal types agree with their target columns. Stops at the
//! first offending construct rather than accumulating errors.
//!
//! `SELECT` statements additionally return an [`AliasMap`], which the
//! optimizer and executor reuse so neither has to re-resolve aliases.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod bound;
mod ddl;
mod dml;
mod error;
mod scope;
mod select;

pub use self::{
    bound::Bound,
    ddl::{validate_create_index, validate_create_table, validate_drop_index, validate_drop_table},
    dml::{validate_delete, validate_insert, validate_update},
    error::ValidationError,
    scope::{build_alias_map, AliasMap},
    select::{referenced_aliases, validate_select},
};

use tinysql_ast::Statement;
use tinysql_catalog::Catalog;

/// Validates any top-level statement (`spec.md` §4.3), returning it
/// wrapped in a [`Bound`] alongside the alias map a `SELECT` produces.
pub fn validate<'a>(stmt: &'a Statement, catalog: &dyn Catalog) -> Result<Bound<'a>, ValidationError> {
    let aliases = match stmt {
        Statement::CreateTable(s) => validate_create_table(s, catalog).map(|_| None)?,
        Statement::DropTable(s) => validate_drop_table(s, catalog).map(|_| None)?,
        Statement::CreateIndex(s) => validate_create_index(s, catalog).map(|_| None)?,
        Statement::DropIndex(s) => validate_drop_index(s, catalog).map(|_| None)?,
        Statement::Insert(s) => validate_insert(s, catalog).map(|_| None)?,
        Statement::Update(s) => validate_update(s, catalog).map(|_| None)?,
        Statement::Delete(s) => validate_delete(s, catalog).map(|_| None)?,
        Statement::Select(s) => validate_select(s, catalog).map(Some)?,
        Statement::ShowTables(_) => None,
        Statement::Describe(s) => {
            if catalog.table_exists(&s.table) {
                None
            } else {
                return Err(ValidationError::TableNotFound(s.table.clone()));
            }
        }
    };
    Ok(Bound { statement: stmt, aliases })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tinysql_ast::{ColumnDef, DataType};
    use tinysql_catalog::{FileCatalog, TableMeta};
    use tinysql_parser::parse;

    fn catalog_with_students() -> FileCatalog {
        let mut catalog = FileCatalog::in_memory();
        catalog
            .create_table(TableMeta::new(
                "students",
                vec![
                    ColumnDef {
                        name: "id".into(),
                        data_type: DataType::Int,
                        is_primary_key: true,
                        is_auto_increment: true,
                        is_not_null: true,
                    },
                    ColumnDef {
                        name: "name".into(),
                        data_type: DataType::Str,
                        is_primary_key: false,
                        is_auto_increment: false,
                        is_not_null: false,
                    },
                ],
                HashMap::new(),
            ))
            .unwrap();
        catalog
    }

    #[test]
    fn select_with_unknown_column_is_rejected() {
        let catalog = catalog_with_students();
        let stmt = parse("SELECT missing FROM students").unwrap();
        let err = validate(&stmt, &catalog).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownColumn {
                qualifier: None,
                column: "missing".into(),
            }
        );
    }

    #[test]
    fn select_star_returns_an_alias_map() {
        let catalog = catalog_with_students();
        let stmt = parse("SELECT * FROM students").unwrap();
        let bound = validate(&stmt, &catalog).unwrap();
        assert!(bound.aliases.is_some());
        assert_eq!(bound.aliases.unwrap().real_table("students"), Some("students"));
    }

    #[test]
    fn insert_type_mismatch_is_rejected() {
        let catalog = catalog_with_students();
        let stmt = parse("INSERT INTO students (id, name) VALUES ('x', 'Jane')").unwrap();
        let err = validate(&stmt, &catalog).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                column: "id".into(),
                expected: DataType::Int,
                found: DataType::Str,
            }
        );
    }

    #[test]
    fn drop_nonexistent_table_is_rejected() {
        let catalog = FileCatalog::in_memory();
        let stmt = parse("DROP TABLE ghost").unwrap();
        let err = validate(&stmt, &catalog).unwrap_err();
        assert_eq!(err, ValidationError::TableNotFound("ghost".into()));
    }

    #[test]
    fn create_table_with_duplicate_column_is_rejected() {
        let catalog = FileCatalog::in_memory();
        let stmt = parse("CREATE TABLE t (id INTEGER PRIMARY KEY, id STRING)").unwrap();
        let err = validate(&stmt, &catalog).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateColumnName {
                table: "t".into(),
                column: "id".into(),
            }
        );
    }
}
