//! # tinysql-optimizer
//!
//! Turns a validated `SELECT` into a [`PlanTree`] (`spec.md` §4.4):
//! reorders its `WHERE` conjunction by estimated selectivity, splits it
//! into per-alias scan predicates and a post-join remainder, and chooses
//! a join algorithm and orientation for every join edge. Operates only on
//! `SELECT` — every other statement kind executes directly.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod join;
mod plan;
mod pushdown;
mod selectivity;

pub use self::{
    join::{choose_join_strategy, JoinMethod, JoinPlan},
    plan::{ExecutionPlanSummary, JoinEstimate, PlanTree, ScanEstimate},
    pushdown::Pushdown,
    selectivity::{estimate, reorder_conjunction},
};

use std::collections::HashMap;

use tinysql_ast::SelectStmt;
use tinysql_catalog::Catalog;
use tinysql_storage::StorageEngine;
use tinysql_validator::AliasMap;

/// Builds the [`PlanTree`] for a validated `SELECT` (`spec.md` §4.4). The
/// caller supplies the [`AliasMap`] the validator already built for this
/// statement so the optimizer never re-resolves aliases.
pub fn optimize(
    select: &SelectStmt,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> PlanTree {
    let filter = select
        .filter
        .as_ref()
        .map(|cond| reorder_conjunction(cond, aliases, catalog, storage));
    let split = filter.as_ref().map(pushdown::split).unwrap_or_default();

    let mut relation_rows: HashMap<String, u64> = HashMap::new();
    for alias in std::iter::once(select.from.alias().to_string())
        .chain(select.joins.iter().map(|j| j.table.alias().to_string()))
    {
        let rows = aliases
            .real_table(&alias)
            .and_then(|table| catalog.table(table).ok())
            .map(|meta| meta.record_count)
            .unwrap_or(0);
        relation_rows.insert(alias, rows);
    }

    let mut scans: Vec<ScanEstimate> = relation_rows
        .iter()
        .map(|(alias, &base_rows)| {
            let table = aliases.real_table(alias).unwrap_or(alias).to_string();
            let selectivity = split
                .per_alias
                .get(alias)
                .map(|cond| estimate(cond, aliases, catalog, storage))
                .unwrap_or(1.0);
            ScanEstimate {
                alias: alias.clone(),
                table,
                base_rows,
                selectivity,
                estimated_rows: base_rows as f64 * selectivity,
            }
        })
        .collect();
    scans.sort_by(|a, b| a.alias.cmp(&b.alias));

    let mut joins = Vec::with_capacity(select.joins.len());
    let mut join_estimates = Vec::with_capacity(select.joins.len());
    for join in &select.joins {
        let inner_alias = join.table.alias();
        let (left_alias, left_column, right_alias, right_column) =
            if join.on.right.qualifier.as_deref() == Some(inner_alias) {
                (
                    join.on.left.qualifier.clone().unwrap_or_default(),
                    join.on.left.name.clone(),
                    join.on.right.qualifier.clone().unwrap_or_default(),
                    join.on.right.name.clone(),
                )
            } else {
                (
                    join.on.right.qualifier.clone().unwrap_or_default(),
                    join.on.right.name.clone(),
                    join.on.left.qualifier.clone().unwrap_or_default(),
                    join.on.left.name.clone(),
                )
            };

        let left_card = relation_rows.get(&left_alias).copied().unwrap_or(0);
        let right_card = relation_rows.get(&right_alias).copied().unwrap_or(0);
        let left_indexed = is_indexed(&left_alias, &left_column, aliases, catalog);
        let right_indexed = is_indexed(&right_alias, &right_column, aliases, catalog);

        let plan = choose_join_strategy(
            &left_alias,
            &left_column,
            left_card,
            left_indexed,
            &right_alias,
            &right_column,
            right_card,
            right_indexed,
        );
        let estimated_rows = left_card as f64 * right_card as f64 * 0.1;
        tracing::debug!(
            method = %plan.method,
            outer = %plan.outer,
            inner = %plan.inner,
            "chose join strategy"
        );
        join_estimates.push(JoinEstimate { join: plan.clone(), estimated_rows });
        joins.push(plan);
    }

    PlanTree {
        filter,
        pushdown: split,
        joins,
        execution_plan: ExecutionPlanSummary { scans, joins: join_estimates },
    }
}

fn is_indexed(alias: &str, column: &str, aliases: &AliasMap, catalog: &dyn Catalog) -> bool {
    aliases
        .real_table(alias)
        .and_then(|table| catalog.table(table).ok())
        .map(|meta| meta.is_indexed(column))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as StdHashMap;
    use tinysql_ast::{ColumnDef, DataType, Statement};
    use tinysql_catalog::{FileCatalog, TableMeta};
    use tinysql_parser::parse;

    fn catalog() -> FileCatalog {
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
                        name: "age".into(),
                        data_type: DataType::Int,
                        is_primary_key: false,
                        is_auto_increment: false,
                        is_not_null: false,
                    },
                ],
                StdHashMap::new(),
            ))
            .unwrap();
        catalog.set_record_count("students", 50).unwrap();
        catalog
    }

    #[test]
    fn select_with_where_produces_per_alias_pushdown() {
        let catalog = catalog();
        let storage_dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::new(storage_dir.path());
        let select = match parse("SELECT * FROM students s WHERE s.age = 20").unwrap() {
            Statement::Select(s) => s,
            other => panic!("expected SELECT, got {:?}", other),
        };
        let stmt = Statement::Select(select.clone());
        let bound = tinysql_validator::validate(&stmt, &catalog).unwrap();
        let plan = optimize(&select, bound.aliases.as_ref().unwrap(), &catalog, &storage);
        assert!(plan.pushdown.per_alias.contains_key("s"));
        assert!(plan.pushdown.post_join.is_none());
    }

    #[test]
    fn select_with_no_joins_produces_no_join_plans() {
        let catalog = catalog();
        let storage_dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::new(storage_dir.path());
        let select = match parse("SELECT * FROM students s").unwrap() {
            Statement::Select(s) => s,
            other => panic!("expected SELECT, got {:?}", other),
        };
        let stmt = Statement::Select(select.clone());
        let bound = tinysql_validator::validate(&stmt, &catalog).unwrap();
        let plan = optimize(&select, bound.aliases.as_ref().unwrap(), &catalog, &storage);
        assert!(plan.joins.is_empty());
        assert_eq!(plan.execution_plan.scans.len(), 1);
        assert_eq!(plan.execution_plan.scans[0].base_rows, 50);
    }
}
