mod aggregate;
mod join;
mod order;

use std::collections::HashMap;

use tinysql_ast::{ColumnItem, Condition, Projection, SelectStmt, TableRef, Value};
use tinysql_catalog::Catalog;
use tinysql_optimizer::PlanTree;
use tinysql_storage::{RecordStream, StorageEngine};
use tinysql_validator::AliasMap;

use crate::error::ExecutionError;
use crate::eval;
use crate::result::ResultSet;
use crate::row::Row;

pub(crate) use aggregate::eval_condition_grouped;
use aggregate::Group;

/// Runs a validated, optimized top-level `SELECT` to completion
/// (`spec.md` §4.5): scan, join, filter, group, project, order, then
/// paginate, rendering the final typed relation to display strings.
pub(crate) fn run(
    select: &SelectStmt,
    plan: &PlanTree,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> Result<ResultSet, ExecutionError> {
    let (columns, rows) = run_select_typed(select, plan, aliases, catalog, storage)?;
    let rendered = rows
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(c).cloned().unwrap_or(Value::Absent).display_or_null())
                .collect()
        })
        .collect();
    Ok(ResultSet { columns, rows: rendered })
}

/// The typed counterpart to [`run`], used both for the top-level result
/// and to feed a derived table or an `IN (SELECT ...)` subquery back into
/// an outer query as ordinary [`Value`]s.
pub(crate) fn run_select_typed(
    select: &SelectStmt,
    plan: &PlanTree,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> Result<(Vec<String>, Vec<HashMap<String, Value>>), ExecutionError> {
    let from_alias = select.from.alias();
    let mut relation = build_relation(
        &select.from,
        from_alias,
        aliases,
        catalog,
        storage,
        plan.pushdown.per_alias.get(from_alias),
    )?;

    for (join_clause, join_plan) in select.joins.iter().zip(plan.joins.iter()) {
        relation = join::apply_join(relation, join_clause, join_plan, aliases, catalog, storage, &plan.pushdown)?;
    }

    if let Some(cond) = &plan.pushdown.post_join {
        let mut kept = Vec::with_capacity(relation.len());
        for row in relation {
            if eval::eval_condition(cond, &row, catalog, storage)? {
                kept.push(row);
            }
        }
        relation = kept;
    }

    let needs_grouping =
        !select.group_by.is_empty() || select.having.is_some() || projection_has_aggregate(&select.projection);

    let mut groups = if needs_grouping {
        aggregate::compute_groups(relation, &select.group_by)
    } else {
        relation
            .into_iter()
            .map(|row| Group { representative: row.clone(), members: vec![row] })
            .collect()
    };

    if let Some(having) = &select.having {
        let mut kept = Vec::with_capacity(groups.len());
        for group in groups {
            if eval_condition_grouped(having, &group.members, catalog, storage)? {
                kept.push(group);
            }
        }
        groups = kept;
    }

    let output_columns = all_columns(select, catalog);
    let columns = projection_columns(&select.projection, &output_columns);
    let mut entries: Vec<(Row, Vec<Value>)> = groups
        .into_iter()
        .map(|group| {
            let cells = project_cells(&select.projection, &group, &output_columns);
            (group.representative, cells)
        })
        .collect();

    entries.sort_by(|(a_rep, _), (b_rep, _)| {
        for item in &select.order_by {
            let av = eval::resolve_value(&item.column, a_rep);
            let bv = eval::resolve_value(&item.column, b_rep);
            let ordering = order::compare_for_order(&av, &bv, item.descending);
            if ordering != std::cmp::Ordering::Equal {
                return ordering;
            }
        }
        std::cmp::Ordering::Equal
    });

    let offset = select.offset.unwrap_or(0).max(0) as usize;
    let mut entries: Vec<_> = entries.into_iter().skip(offset).collect();
    if let Some(limit) = select.limit {
        entries.truncate(limit.max(0) as usize);
    }

    let rows = entries
        .into_iter()
        .map(|(_, cells)| columns.iter().cloned().zip(cells).collect::<HashMap<_, _>>())
        .collect();

    Ok((columns, rows))
}

/// Independently validates, optimizes, and runs a nested `SELECT`
/// (a derived table or the right-hand side of `IN (...)`). The top-level
/// `optimize()` call only ever plans the outermost statement, so any
/// nested statement the executor encounters mid-execution must be
/// planned here instead.
pub(crate) fn run_nested_select(
    select: &SelectStmt,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> Result<(Vec<String>, Vec<HashMap<String, Value>>), ExecutionError> {
    let aliases = tinysql_validator::validate_select(select, catalog)?;
    let plan = tinysql_optimizer::optimize(select, &aliases, catalog, storage);
    run_select_typed(select, &plan, &aliases, catalog, storage)
}

fn build_relation(
    table_ref: &TableRef,
    alias: &str,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
    pushdown: Option<&Condition>,
) -> Result<Vec<Row>, ExecutionError> {
    match table_ref {
        TableRef::Named(name, _) => {
            let stream = storage.record_stream(name);
            let mut rows = Vec::new();
            for slot in stream.read_all()?.into_iter().filter(|s| s.is_live) {
                let row = slot_to_row(alias, &slot);
                if let Some(cond) = pushdown {
                    if !eval::eval_condition(cond, &row, catalog, storage)? {
                        continue;
                    }
                }
                rows.push(row);
            }
            Ok(rows)
        }
        TableRef::Derived(nested, _) => {
            let (columns, typed_rows) = run_nested_select(nested, catalog, storage)?;
            let mut rows = Vec::new();
            for typed in typed_rows {
                let mut values = HashMap::new();
                for column in &columns {
                    values.insert(format!("{alias}.{column}"), typed.get(column).cloned().unwrap_or(Value::Absent));
                }
                let row = Row { values, slots: HashMap::new() };
                if let Some(cond) = pushdown {
                    if !eval::eval_condition(cond, &row, catalog, storage)? {
                        continue;
                    }
                }
                rows.push(row);
            }
            Ok(rows)
        }
    }
}

pub(crate) fn slot_to_row(alias: &str, slot: &tinysql_storage::Slot) -> Row {
    let mut values = HashMap::new();
    for (column, value) in &slot.record {
        values.insert(format!("{alias}.{column}"), value.clone());
    }
    let mut slots = HashMap::new();
    slots.insert(alias.to_string(), slot.slot_id);
    Row { values, slots }
}

fn projection_has_aggregate(projection: &Projection) -> bool {
    match projection {
        Projection::All => false,
        Projection::Columns(items) => items.iter().any(|item| matches!(item, ColumnItem::Aggregate(_, _))),
    }
}

/// Every `(alias, column)` pair a bare `SELECT *` expands to, in
/// from-then-join order. Computed from catalog/derived-table shape alone
/// so it never depends on whether the relation happens to be empty.
fn all_columns(select: &SelectStmt, catalog: &dyn Catalog) -> Vec<(String, String)> {
    let mut out = Vec::new();
    out.extend(columns_of(&select.from, catalog).into_iter().map(|c| (select.from.alias().to_string(), c)));
    for join_clause in &select.joins {
        out.extend(columns_of(&join_clause.table, catalog).into_iter().map(|c| (join_clause.table.alias().to_string(), c)));
    }
    out
}

fn columns_of(table_ref: &TableRef, catalog: &dyn Catalog) -> Vec<String> {
    match table_ref {
        TableRef::Named(name, _) => catalog
            .table(name)
            .map(|meta| meta.columns.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default(),
        TableRef::Derived(nested, _) => match &nested.projection {
            Projection::Columns(items) => items.iter().map(|item| item.output_name()).collect(),
            Projection::All => columns_of(&nested.from, catalog),
        },
    }
}

fn projection_columns(projection: &Projection, output_columns: &[(String, String)]) -> Vec<String> {
    match projection {
        Projection::Columns(items) => items.iter().map(|item| item.output_name()).collect(),
        Projection::All => output_columns.iter().map(|(_, column)| column.clone()).collect(),
    }
}

fn project_cells(projection: &Projection, group: &Group, output_columns: &[(String, String)]) -> Vec<Value> {
    match projection {
        Projection::Columns(items) => items
            .iter()
            .map(|item| match item {
                ColumnItem::Column(qn, _) => eval::resolve_value(qn, &group.representative),
                ColumnItem::Aggregate(agg, _) => aggregate::agg_to_value(aggregate::eval_aggregate(agg, &group.members)),
            })
            .collect(),
        Projection::All => output_columns
            .iter()
            .map(|(alias, column)| group.representative.get(alias, column))
            .collect(),
    }
}
