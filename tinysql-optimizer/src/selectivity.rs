use tinysql_ast::{CompareOp, Condition, Expr, QualifiedName};
use tinysql_catalog::Catalog;
use tinysql_storage::StorageEngine;
use tinysql_validator::AliasMap;

/// Estimates the fraction of rows a condition passes (`spec.md` §4.4's
/// selectivity table). `AND` combines by the independence-assumption
/// product; `OR` by `a + b - a*b`.
pub fn estimate(
    cond: &Condition,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> f64 {
    match cond {
        Condition::Comparison(l, op, r) => estimate_comparison(l, *op, r, aliases, catalog, storage),
        Condition::And(l, r) => {
            estimate(l, aliases, catalog, storage) * estimate(r, aliases, catalog, storage)
        }
        Condition::Or(l, r) => {
            let a = estimate(l, aliases, catalog, storage);
            let b = estimate(r, aliases, catalog, storage);
            a + b - a * b
        }
        // Correlated-free `IN (subquery)` is opaque to this cardinality model.
        Condition::InSubquery(_, _) => 0.5,
    }
}

fn estimate_comparison(
    left: &Expr,
    op: CompareOp,
    right: &Expr,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> f64 {
    let column = match (left, right) {
        (Expr::Column(col), other) if !matches!(other, Expr::Column(_)) => Some(col),
        (other, Expr::Column(col)) if !matches!(other, Expr::Column(_)) => Some(col),
        _ => None,
    };
    let Some(column) = column else {
        return 0.5;
    };
    let unique_keys = indexed_unique_key_count(column, aliases, catalog, storage);

    if op.is_ordering() {
        return if unique_keys.is_some() { 0.5 } else { 0.3 };
    }
    match (op, unique_keys) {
        (CompareOp::Eq, Some(unique)) => 1.0 / unique.max(1) as f64,
        (CompareOp::Eq, None) => 0.1,
        (CompareOp::NotEq, Some(unique)) => 1.0 - 1.0 / unique.max(1) as f64,
        (CompareOp::NotEq, None) => 0.9,
        // `LIKE` and anything else: complex/unknown.
        _ => 0.5,
    }
}

/// The number of distinct keys in `column`'s index, if it is indexed.
/// Resolves an unqualified reference by finding the (unique, per the
/// validator's prior resolution) in-scope alias whose table has it.
fn indexed_unique_key_count(
    column: &QualifiedName,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> Option<u64> {
    let table = match &column.qualifier {
        Some(alias) => aliases.real_table(alias)?,
        None => aliases
            .aliases()
            .filter_map(|alias| aliases.real_table(alias))
            .find(|table| {
                catalog
                    .table(table)
                    .map(|meta| meta.has_column(&column.name))
                    .unwrap_or(false)
            })?,
    };
    let meta = catalog.table(table).ok()?;
    if !meta.is_indexed(&column.name) {
        return None;
    }
    storage.index(table, &column.name).unique_key_count().ok()
}

/// Reorders a top-level `AND` chain so its most selective leaf (lowest
/// estimate) is evaluated first (`spec.md` §4.4). Leaves that are not
/// themselves `AND` nodes (including any top-level `OR`) pass through
/// unchanged, since reordering only applies to conjunctions.
pub fn reorder_conjunction(
    cond: &Condition,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> Condition {
    if !matches!(cond, Condition::And(_, _)) {
        return cond.clone();
    }
    let mut leaves: Vec<(f64, Condition)> = cond
        .and_leaves()
        .into_iter()
        .map(|leaf| (estimate(leaf, aliases, catalog, storage), leaf.clone()))
        .collect();
    leaves.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    let reordered: Vec<Condition> = leaves.into_iter().map(|(_, leaf)| leaf).collect();
    Condition::and_chain(reordered).expect("and_leaves always yields at least one leaf")
}
