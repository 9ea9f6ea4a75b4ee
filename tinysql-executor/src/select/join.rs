use std::cmp::Ordering;
use std::collections::HashMap;

use tinysql_ast::{Join, Value};
use tinysql_catalog::Catalog;
use tinysql_optimizer::{JoinMethod, JoinPlan, Pushdown};
use tinysql_storage::{Index, RecordStream, StorageEngine};
use tinysql_validator::AliasMap;

use crate::error::ExecutionError;
use crate::eval;
use crate::row::Row;

use super::build_relation;

/// Applies one join edge to the relation accumulated so far, following
/// the algorithm and orientation the optimizer already chose
/// (`spec.md` §4.4/§4.5): the executor never reconsiders `plan.method`.
pub(crate) fn apply_join(
    accumulated: Vec<Row>,
    join: &Join,
    plan: &JoinPlan,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
    pushdown: &Pushdown,
) -> Result<Vec<Row>, ExecutionError> {
    let new_alias = join.table.alias();
    let new_pushdown = pushdown.per_alias.get(new_alias);

    if plan.method == JoinMethod::IndexNestedLoop && index_available(plan, aliases, catalog) {
        return index_nested_loop(accumulated, join, plan, new_alias, aliases, catalog, storage, new_pushdown);
    }

    let new_relation = build_relation(&join.table, new_alias, aliases, catalog, storage, new_pushdown)?;
    let (acc_alias, acc_column, new_column) = role_split(plan, new_alias);
    Ok(match plan.method {
        JoinMethod::HashJoin => hash_join(accumulated, new_relation, plan, new_alias, &acc_alias, &acc_column, &new_column),
        JoinMethod::SortMerge => sort_merge(accumulated, new_relation, &acc_alias, &acc_column, new_alias, &new_column),
        JoinMethod::IndexNestedLoop | JoinMethod::NestedLoop => {
            nested_loop(accumulated, new_relation, &acc_alias, &acc_column, new_alias, &new_column)
        }
    })
}

/// Whether the catalog still reports the chosen inner alias as indexed
/// on its join column. A missing index (e.g. a derived table as the
/// inner side, or a corrupted/removed index file) falls back to a plain
/// nested loop rather than the index lookup the optimizer requested.
fn index_available(plan: &JoinPlan, aliases: &AliasMap, catalog: &dyn Catalog) -> bool {
    aliases
        .real_table(&plan.inner)
        .and_then(|table| catalog.table(table).ok())
        .map(|meta| meta.is_indexed(&plan.inner_column))
        .unwrap_or(false)
}

/// Resolves which alias/column pair belongs to the already-accumulated
/// relation and which belongs to the freshly-scanned alias, independent
/// of whether the optimizer labeled the new alias `outer` or `inner`.
fn role_split(plan: &JoinPlan, new_alias: &str) -> (String, String, String) {
    if plan.outer == new_alias {
        (plan.inner.clone(), plan.inner_column.clone(), plan.outer_column.clone())
    } else {
        (plan.outer.clone(), plan.outer_column.clone(), plan.inner_column.clone())
    }
}

fn keys_match(a: &Value, b: &Value) -> bool {
    a.is_present() && b.is_present() && a == b
}

fn nested_loop(
    accumulated: Vec<Row>,
    new_relation: Vec<Row>,
    acc_alias: &str,
    acc_column: &str,
    new_alias: &str,
    new_column: &str,
) -> Vec<Row> {
    let mut out = Vec::new();
    for arow in &accumulated {
        let ak = arow.get(acc_alias, acc_column);
        if !ak.is_present() {
            continue;
        }
        for nrow in &new_relation {
            let nk = nrow.get(new_alias, new_column);
            if keys_match(&ak, &nk) {
                out.push(arow.merge(nrow));
            }
        }
    }
    out
}

fn sort_merge(
    accumulated: Vec<Row>,
    new_relation: Vec<Row>,
    acc_alias: &str,
    acc_column: &str,
    new_alias: &str,
    new_column: &str,
) -> Vec<Row> {
    let mut left: Vec<(Value, Row)> = accumulated
        .into_iter()
        .filter_map(|r| {
            let key = r.get(acc_alias, acc_column);
            key.is_present().then(|| (key, r))
        })
        .collect();
    let mut right: Vec<(Value, Row)> = new_relation
        .into_iter()
        .filter_map(|r| {
            let key = r.get(new_alias, new_column);
            key.is_present().then(|| (key, r))
        })
        .collect();
    left.sort_by(|a, b| a.0.cmp(&b.0));
    right.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < left.len() && j < right.len() {
        match left[i].0.cmp(&right[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                let key = left[i].0.clone();
                let mut ii = i;
                while ii < left.len() && left[ii].0 == key {
                    ii += 1;
                }
                let mut jj = j;
                while jj < right.len() && right[jj].0 == key {
                    jj += 1;
                }
                for li in i..ii {
                    for rj in j..jj {
                        out.push(left[li].1.merge(&right[rj].1));
                    }
                }
                i = ii;
                j = jj;
            }
        }
    }
    out
}

fn hash_join(
    accumulated: Vec<Row>,
    new_relation: Vec<Row>,
    plan: &JoinPlan,
    new_alias: &str,
    acc_alias: &str,
    acc_column: &str,
    new_column: &str,
) -> Vec<Row> {
    let new_is_inner = plan.inner == new_alias;
    let mut out = Vec::new();
    if new_is_inner {
        let mut table: HashMap<Value, Vec<&Row>> = HashMap::new();
        for r in &new_relation {
            let key = r.get(new_alias, new_column);
            if key.is_present() {
                table.entry(key).or_default().push(r);
            }
        }
        for arow in &accumulated {
            let key = arow.get(acc_alias, acc_column);
            if !key.is_present() {
                continue;
            }
            if let Some(matches) = table.get(&key) {
                for nrow in matches {
                    out.push(arow.merge(nrow));
                }
            }
        }
    } else {
        let mut table: HashMap<Value, Vec<&Row>> = HashMap::new();
        for r in &accumulated {
            let key = r.get(acc_alias, acc_column);
            if key.is_present() {
                table.entry(key).or_default().push(r);
            }
        }
        for nrow in &new_relation {
            let key = nrow.get(new_alias, new_column);
            if !key.is_present() {
                continue;
            }
            if let Some(matches) = table.get(&key) {
                for arow in matches {
                    out.push(arow.merge(nrow));
                }
            }
        }
    }
    out
}

/// An index-nested-loop join where the indexed ("inner") side may be an
/// alias introduced several joins ago, not necessarily the alias this
/// edge introduces. `Row::slots` lets a physical slot id returned by the
/// index lookup be matched back against the already-accumulated rows
/// that still carry it.
#[allow(clippy::too_many_arguments)]
fn index_nested_loop(
    accumulated: Vec<Row>,
    join: &Join,
    plan: &JoinPlan,
    new_alias: &str,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
    new_pushdown: Option<&tinysql_ast::Condition>,
) -> Result<Vec<Row>, ExecutionError> {
    let inner_table = aliases
        .real_table(&plan.inner)
        .expect("index_available already confirmed a catalog table backs this alias")
        .to_string();
    let index = storage.index(&inner_table, &plan.inner_column);
    let record_stream = storage.record_stream(&inner_table);

    if plan.inner == new_alias {
        let outer_alias = plan.outer.clone();
        let mut out = Vec::new();
        for arow in accumulated {
            let outer_value = arow.get(&outer_alias, &plan.outer_column);
            if !outer_value.is_present() {
                continue;
            }
            let slot_ids = index.lookup(&outer_value)?;
            for slot_id in slot_ids {
                let Some(slot) = record_stream.read(slot_id)? else {
                    continue;
                };
                if !slot.is_live {
                    continue;
                }
                let nrow = super::slot_to_row(new_alias, &slot);
                if let Some(cond) = new_pushdown {
                    if !eval::eval_condition(cond, &nrow, catalog, storage)? {
                        continue;
                    }
                }
                out.push(arow.merge(&nrow));
            }
        }
        Ok(out)
    } else {
        let inner_alias = plan.inner.clone();
        let new_relation = build_relation(&join.table, new_alias, aliases, catalog, storage, new_pushdown)?;
        let mut out = Vec::new();
        for nrow in new_relation {
            let outer_value = nrow.get(new_alias, &plan.outer_column);
            if !outer_value.is_present() {
                continue;
            }
            let slot_ids = index.lookup(&outer_value)?;
            if slot_ids.is_empty() {
                continue;
            }
            for arow in &accumulated {
                if let Some(&slot_id) = arow.slots.get(&inner_alias) {
                    if slot_ids.contains(&slot_id) {
                        out.push(arow.merge(&nrow));
                    }
                }
            }
        }
        Ok(out)
    }
}
