use std::collections::HashSet;

use tinysql_ast::{CompareOp, Condition, Expr, QualifiedName, SelectStmt, Value};
use tinysql_catalog::Catalog;
use tinysql_storage::StorageEngine;

use crate::error::ExecutionError;
use crate::row::Row;

/// Resolves a (possibly unqualified) column reference against a row.
/// Validation already guaranteed the reference is unambiguous, so an
/// unqualified name is resolved by scanning every alias present on the
/// row for a matching key.
pub(crate) fn resolve_value(qn: &QualifiedName, row: &Row) -> Value {
    if let Some(qualifier) = &qn.qualifier {
        return row.get(qualifier, &qn.name);
    }
    let suffix = format!(".{}", qn.name);
    row.values
        .iter()
        .find(|(k, _)| k.ends_with(&suffix))
        .map(|(_, v)| v.clone())
        .unwrap_or(Value::Absent)
}

/// Extracts the literal value an `INSERT`/`UPDATE` assignment carries.
/// The validator only ever lets an `IntLit`/`StrLit` reach these
/// positions, so any other expression shape is unreachable in practice.
pub(crate) fn literal_value(expr: &Expr) -> Value {
    match expr {
        Expr::IntLit(n) => Value::Int(*n),
        Expr::StrLit(s) => Value::Str(s.clone()),
        _ => Value::Absent,
    }
}

pub(crate) fn eval_expr(expr: &Expr, row: &Row) -> Value {
    match expr {
        Expr::Column(qn) => resolve_value(qn, row),
        Expr::IntLit(n) => Value::Int(*n),
        Expr::StrLit(s) => Value::Str(s.clone()),
        Expr::Aggregate(_) => Value::Absent,
    }
}

/// A comparison where either side is absent is always false (`spec.md`
/// §4.5 B6), including `!=`.
pub(crate) fn compare(left: &Value, op: CompareOp, right: &Value) -> bool {
    if !left.is_present() || !right.is_present() {
        return false;
    }
    match op {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        CompareOp::Lt => left < right,
        CompareOp::LtEq => left <= right,
        CompareOp::Gt => left > right,
        CompareOp::GtEq => left >= right,
        CompareOp::Like => match (left, right) {
            (Value::Str(s), Value::Str(pattern)) => sql_like(s, pattern),
            _ => false,
        },
    }
}

pub(crate) fn eval_condition(
    cond: &Condition,
    row: &Row,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> Result<bool, ExecutionError> {
    match cond {
        Condition::Comparison(l, op, r) => Ok(compare(&eval_expr(l, row), *op, &eval_expr(r, row))),
        Condition::And(l, r) => {
            Ok(eval_condition(l, row, catalog, storage)? && eval_condition(r, row, catalog, storage)?)
        }
        Condition::Or(l, r) => {
            Ok(eval_condition(l, row, catalog, storage)? || eval_condition(r, row, catalog, storage)?)
        }
        Condition::InSubquery(expr, select) => {
            let value = eval_expr(expr, row);
            if !value.is_present() {
                return Ok(false);
            }
            let set = in_subquery_values(select, catalog, storage)?;
            Ok(set.contains(&value))
        }
    }
}

/// Runs a nested `SELECT` that appears inside an `IN (...)` condition and
/// collects its single projected column into a lookup set.
pub(crate) fn in_subquery_values(
    select: &SelectStmt,
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> Result<HashSet<Value>, ExecutionError> {
    let (columns, rows) = crate::select::run_nested_select(select, catalog, storage)?;
    let Some(column) = columns.first() else {
        return Ok(HashSet::new());
    };
    Ok(rows
        .into_iter()
        .filter_map(|row| row.get(column).cloned())
        .filter(Value::is_present)
        .collect())
}

/// Matches `input` against a SQL `LIKE` pattern (`%` any run, `_` any one
/// character), anchored over the whole string.
pub(crate) fn sql_like(input: &str, pattern: &str) -> bool {
    fn matches(input: &[u8], pattern: &[u8]) -> bool {
        match (input.first(), pattern.first()) {
            (_, Some(b'%')) => matches(input, &pattern[1..]) || (!input.is_empty() && matches(&input[1..], pattern)),
            (Some(_), Some(b'_')) => matches(&input[1..], &pattern[1..]),
            (Some(a), Some(b)) if a == b => matches(&input[1..], &pattern[1..]),
            (None, None) => true,
            _ => false,
        }
    }
    matches(input.as_bytes(), pattern.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_matches_percent_and_underscore() {
        assert!(sql_like("Jane Doe", "Jane%"));
        assert!(sql_like("Jane", "J_ne"));
        assert!(!sql_like("Jane", "Doe%"));
    }

    #[test]
    fn comparison_against_absent_is_always_false() {
        assert!(!compare(&Value::Absent, CompareOp::Eq, &Value::Int(1)));
        assert!(!compare(&Value::Int(1), CompareOp::NotEq, &Value::Absent));
    }
}
