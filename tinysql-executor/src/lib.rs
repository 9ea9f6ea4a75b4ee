//! # tinysql-executor
//!
//! Runs a validated statement against the catalog and storage engine
//! (`spec.md` §4.5), dispatching on its kind: DDL mutates the catalog and
//! the table/index files directly; DML reads/writes record streams and
//! indexes while enforcing primary-key and foreign-key constraints;
//! `SELECT` is planned by `tinysql-optimizer` and run by the [`select`]
//! pipeline. Mirrors the per-statement state machine in `spec.md` §4.5:
//! by the time [`execute`] is called a statement is already `Parsed` and
//! `Validated`; this crate carries it through `Optimized` (`SELECT` only),
//! `Executing`, and on to `Succeeded`/`Failed`.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod ddl;
mod delete;
mod describe;
mod error;
mod eval;
mod insert;
mod row;
mod select;
mod update;

use tinysql_ast::Statement;
use tinysql_catalog::Catalog;
use tinysql_storage::StorageEngine;
use tinysql_validator::AliasMap;

pub use self::{
    error::ExecutionError,
    result::{Outcome, ResultSet},
};

mod result;

/// Runs a validated top-level [`Statement`] to completion (`spec.md`
/// §4.5). `aliases` must be `Some` (the [`AliasMap`] the validator built
/// for this statement) when `stmt` is a `SELECT`, and is ignored
/// otherwise; the optimizer's [`tinysql_optimizer::PlanTree`] is built
/// internally, right before running the plan, so callers never construct
/// one themselves.
pub fn execute(
    stmt: &Statement,
    aliases: Option<&AliasMap>,
    catalog: &mut dyn Catalog,
    storage: &StorageEngine,
) -> Result<Outcome, ExecutionError> {
    let span = tracing::info_span!("execute", statement = stmt.kind_name());
    let _enter = span.enter();

    match stmt {
        Statement::CreateTable(s) => ddl::create_table(s, catalog).map(Outcome::Message),
        Statement::DropTable(s) => ddl::drop_table(s, catalog, storage).map(Outcome::Message),
        Statement::CreateIndex(s) => ddl::create_index(s, catalog, storage).map(Outcome::Message),
        Statement::DropIndex(s) => ddl::drop_index(s, catalog, storage).map(Outcome::Message),
        Statement::Insert(s) => insert::execute(s, catalog, storage).map(Outcome::Message),
        Statement::Update(s) => update::execute(s, catalog, storage).map(Outcome::Message),
        Statement::Delete(s) => delete::execute(s, catalog, storage).map(Outcome::Message),
        Statement::ShowTables(_) => Ok(Outcome::Rows(describe::show_tables(&*catalog))),
        Statement::Describe(s) => describe::describe(s, &*catalog).map(Outcome::Rows),
        Statement::Select(s) => {
            let aliases = aliases.expect("a SELECT must carry the AliasMap the validator produced for it");
            let plan = tinysql_optimizer::optimize(s, aliases, &*catalog, storage);
            select::run(s, &plan, aliases, &*catalog, storage).map(Outcome::Rows)
        }
    }
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
                    ColumnDef {
                        name: "age".into(),
                        data_type: DataType::Int,
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

    fn run(sql: &str, catalog: &mut FileCatalog, storage: &StorageEngine) -> Result<Outcome, ExecutionError> {
        let stmt = parse(sql).unwrap();
        let bound = tinysql_validator::validate(&stmt, catalog).unwrap();
        execute(&stmt, bound.aliases.as_ref(), catalog, storage)
    }

    #[test]
    fn insert_then_select_round_trips() {
        let mut catalog = catalog_with_students();
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::new(dir.path());

        run("INSERT INTO students VALUES (1, 'John Doe', 20)", &mut catalog, &storage).unwrap();
        let outcome = run("SELECT name FROM students WHERE age = 20", &mut catalog, &storage).unwrap();
        match outcome {
            Outcome::Rows(rs) => {
                assert_eq!(rs.columns, vec!["name"]);
                assert_eq!(rs.rows, vec![vec!["John Doe".to_string()]]);
            }
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn missing_primary_key_is_auto_assigned_starting_at_one() {
        let mut catalog = catalog_with_students();
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::new(dir.path());

        run("INSERT INTO students (name, age) VALUES ('A', 1)", &mut catalog, &storage).unwrap();
        run("INSERT INTO students (name, age) VALUES ('B', 2)", &mut catalog, &storage).unwrap();
        let outcome = run("SELECT id FROM students ORDER BY id ASC", &mut catalog, &storage).unwrap();
        match outcome {
            Outcome::Rows(rs) => assert_eq!(rs.rows, vec![vec!["1".to_string()], vec!["2".to_string()]]),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_primary_key_is_rejected() {
        let mut catalog = catalog_with_students();
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::new(dir.path());

        run("INSERT INTO students VALUES (1, 'A', 1)", &mut catalog, &storage).unwrap();
        let err = run("INSERT INTO students VALUES (1, 'B', 2)", &mut catalog, &storage).unwrap_err();
        assert_eq!(
            err,
            ExecutionError::DuplicatePrimaryKey {
                table: "students".into(),
                column: "id".into(),
                value: "1".into(),
            }
        );
    }

    #[test]
    fn delete_with_no_matches_reports_zero_not_an_error() {
        let mut catalog = catalog_with_students();
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::new(dir.path());

        let outcome = run("DELETE FROM students WHERE id = 99", &mut catalog, &storage).unwrap();
        assert_eq!(outcome, Outcome::Message("0 record(s) deleted".to_string()));
    }

    #[test]
    fn delete_blocked_by_foreign_key_leaves_no_partial_effect() {
        let mut catalog = catalog_with_students();
        catalog
            .create_table(TableMeta::new(
                "enrollments",
                vec![
                    ColumnDef {
                        name: "id".into(),
                        data_type: DataType::Int,
                        is_primary_key: true,
                        is_auto_increment: true,
                        is_not_null: true,
                    },
                    ColumnDef {
                        name: "sid".into(),
                        data_type: DataType::Int,
                        is_primary_key: false,
                        is_auto_increment: false,
                        is_not_null: false,
                    },
                ],
                HashMap::from([(
                    "sid".to_string(),
                    tinysql_catalog::ForeignKeyRef {
                        ref_table: "students".to_string(),
                        ref_column: "id".to_string(),
                    },
                )]),
            ))
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::new(dir.path());

        run("INSERT INTO students VALUES (1, 'John Doe', 20)", &mut catalog, &storage).unwrap();
        run("INSERT INTO enrollments VALUES (1, 1)", &mut catalog, &storage).unwrap();

        let err = run("DELETE FROM students WHERE id = 1", &mut catalog, &storage).unwrap_err();
        assert_eq!(
            err,
            ExecutionError::ReferentialIntegrity {
                table: "students".into(),
                referencing_table: "enrollments".into(),
            }
        );
        let outcome = run("SELECT COUNT(*) FROM students", &mut catalog, &storage).unwrap();
        match outcome {
            Outcome::Rows(rs) => assert_eq!(rs.rows, vec![vec!["1".to_string()]]),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn show_tables_and_describe() {
        let mut catalog = catalog_with_students();
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::new(dir.path());

        let outcome = run("SHOW TABLES", &mut catalog, &storage).unwrap();
        match outcome {
            Outcome::Rows(rs) => assert_eq!(rs.rows, vec![vec!["students".to_string()]]),
            other => panic!("expected rows, got {:?}", other),
        }

        let outcome = run("DESCRIBE students", &mut catalog, &storage).unwrap();
        match outcome {
            Outcome::Rows(rs) => assert_eq!(rs.columns[0], "column"),
            other => panic!("expected rows, got {:?}", other),
        }
    }
}
