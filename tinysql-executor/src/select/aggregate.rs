use std::collections::HashMap;

use tinysql_ast::{AggregateArg, AggregateExpr, AggregateFunc, CompareOp, Condition, Expr, QualifiedName, Value};
use tinysql_catalog::Catalog;
use tinysql_storage::StorageEngine;

use crate::error::ExecutionError;
use crate::eval;
use crate::row::Row;

/// One `GROUP BY` bucket (or, absent a `GROUP BY`, the single implicit
/// group an aggregate projection or a bare `HAVING` still produces).
/// `representative` resolves non-aggregate projected columns and
/// `ORDER BY` keys; `members` feeds aggregate functions.
#[derive(Clone, Debug)]
pub(crate) struct Group {
    pub(crate) representative: Row,
    pub(crate) members: Vec<Row>,
}

/// An aggregate's result. Distinct from [`Value`] only because `AVG`
/// renders a two-decimal average and the data model has no float scalar
/// type to hold it in (`spec.md` §3's tagged `Value`).
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AggValue {
    Int(i64),
    Str(String),
    Float(f64),
    Absent,
}

impl AggValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            AggValue::Int(n) => Some(*n as f64),
            AggValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Folds an [`AggValue`] back into the data model's [`Value`] for
/// projection. `AVG`'s float is rendered to two decimal places and
/// carried onward as a string.
pub(crate) fn agg_to_value(value: AggValue) -> Value {
    match value {
        AggValue::Int(n) => Value::Int(n),
        AggValue::Str(s) => Value::Str(s),
        AggValue::Float(f) => Value::Str(format!("{:.2}", f)),
        AggValue::Absent => Value::Absent,
    }
}

fn value_to_agg(value: &Value) -> AggValue {
    match value {
        Value::Int(n) => AggValue::Int(*n),
        Value::Str(s) => AggValue::Str(s.clone()),
        Value::Absent => AggValue::Absent,
    }
}

/// Partitions rows into groups keyed by the `GROUP BY` column values.
/// Absent a `GROUP BY`, every row collapses into one implicit group, even
/// when there are zero rows (so `COUNT(*)` over an empty table still
/// yields one row reading `0`, not no rows at all).
pub(crate) fn compute_groups(rows: Vec<Row>, group_by: &[QualifiedName]) -> Vec<Group> {
    if group_by.is_empty() {
        let representative = rows.first().cloned().unwrap_or_default();
        return vec![Group { representative, members: rows }];
    }

    let mut order: Vec<Vec<Value>> = Vec::new();
    let mut buckets: HashMap<Vec<Value>, Vec<Row>> = HashMap::new();
    for row in rows {
        let key: Vec<Value> = group_by.iter().map(|qn| eval::resolve_value(qn, &row)).collect();
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push(row);
    }

    order
        .into_iter()
        .map(|key| {
            let members = buckets.remove(&key).unwrap_or_default();
            let representative = members.first().cloned().unwrap_or_default();
            Group { representative, members }
        })
        .collect()
}

/// Evaluates one aggregate function over a group's member rows. The
/// grammar only ever lets `*` appear as `COUNT`'s argument (`tinysql-parser`
/// rejects `SUM(*)`/`AVG(*)`/`MIN(*)`/`MAX(*)` at parse time), so the other
/// functions never see [`AggregateArg::Star`].
pub(crate) fn eval_aggregate(agg: &AggregateExpr, members: &[Row]) -> AggValue {
    let column = match &agg.arg {
        AggregateArg::Star => return AggValue::Int(members.len() as i64),
        AggregateArg::Column(qn) => qn,
    };
    let values: Vec<Value> = members.iter().map(|row| eval::resolve_value(column, row)).collect();
    match agg.func {
        AggregateFunc::Count => AggValue::Int(values.iter().filter(|v| v.is_present()).count() as i64),
        AggregateFunc::Sum => sum(&values),
        AggregateFunc::Avg => avg(&values),
        AggregateFunc::Min => extreme(&values, true),
        AggregateFunc::Max => extreme(&values, false),
    }
}

/// `SUM` skips absent values; a present non-integer value (which cannot
/// arise from a well-typed `Int` column, but this stays defensive) makes
/// the whole sum absent, matching `MIN`/`MAX`'s all-or-nothing typing.
/// Summing zero present values yields absent, not zero.
fn sum(values: &[Value]) -> AggValue {
    let mut total = 0i64;
    let mut any = false;
    for value in values {
        match value {
            Value::Int(n) => {
                total += n;
                any = true;
            }
            Value::Absent => {}
            Value::Str(_) => return AggValue::Absent,
        }
    }
    if any {
        AggValue::Int(total)
    } else {
        AggValue::Absent
    }
}

fn avg(values: &[Value]) -> AggValue {
    let mut total = 0i64;
    let mut count = 0i64;
    for value in values {
        match value {
            Value::Int(n) => {
                total += n;
                count += 1;
            }
            Value::Absent => {}
            Value::Str(_) => return AggValue::Absent,
        }
    }
    if count == 0 {
        AggValue::Absent
    } else {
        AggValue::Float((total as f64 / count as f64 * 100.0).round() / 100.0)
    }
}

fn extreme(values: &[Value], want_min: bool) -> AggValue {
    let present: Vec<&Value> = values.iter().filter(|v| v.is_present()).collect();
    if present.is_empty() {
        return AggValue::Absent;
    }
    if present.iter().all(|v| matches!(v, Value::Int(_))) {
        let nums = present.iter().map(|v| match v {
            Value::Int(n) => *n,
            _ => unreachable!(),
        });
        let picked = if want_min { nums.min() } else { nums.max() };
        picked.map(AggValue::Int).unwrap_or(AggValue::Absent)
    } else if present.iter().all(|v| matches!(v, Value::Str(_))) {
        let strs = present.iter().map(|v| match v {
            Value::Str(s) => s.clone(),
            _ => unreachable!(),
        });
        let picked = if want_min { strs.min() } else { strs.max() };
        picked.map(AggValue::Str).unwrap_or(AggValue::Absent)
    } else {
        AggValue::Absent
    }
}

fn compare_agg(left: &AggValue, op: CompareOp, right: &AggValue) -> bool {
    if matches!(left, AggValue::Absent) || matches!(right, AggValue::Absent) {
        return false;
    }
    if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
        return match op {
            CompareOp::Eq => a == b,
            CompareOp::NotEq => a != b,
            CompareOp::Lt => a < b,
            CompareOp::LtEq => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::GtEq => a >= b,
            CompareOp::Like => false,
        };
    }
    if let (AggValue::Str(a), AggValue::Str(b)) = (left, right) {
        return match op {
            CompareOp::Eq => a == b,
            CompareOp::NotEq => a != b,
            CompareOp::Lt => a < b,
            CompareOp::LtEq => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::GtEq => a >= b,
            CompareOp::Like => eval::sql_like(a, b),
        };
    }
    false
}

fn eval_group_expr(expr: &Expr, members: &[Row]) -> AggValue {
    match expr {
        Expr::Aggregate(agg) => eval_aggregate(agg, members),
        other => members
            .first()
            .map(|row| value_to_agg(&eval::eval_expr(other, row)))
            .unwrap_or(AggValue::Absent),
    }
}

/// The `HAVING` counterpart to [`eval::eval_condition`]: its leaves may
/// reference either a `GROUP BY` column (resolved against the group's
/// representative row) or an aggregate (resolved over every member row).
pub(crate) fn eval_condition_grouped(
    cond: &Condition,
    members: &[Row],
    catalog: &dyn Catalog,
    storage: &StorageEngine,
) -> Result<bool, ExecutionError> {
    match cond {
        Condition::Comparison(l, op, r) => {
            Ok(compare_agg(&eval_group_expr(l, members), *op, &eval_group_expr(r, members)))
        }
        Condition::And(l, r) => Ok(eval_condition_grouped(l, members, catalog, storage)?
            && eval_condition_grouped(r, members, catalog, storage)?),
        Condition::Or(l, r) => Ok(eval_condition_grouped(l, members, catalog, storage)?
            || eval_condition_grouped(r, members, catalog, storage)?),
        Condition::InSubquery(expr, select) => {
            let value = agg_to_value(eval_group_expr(expr, members));
            if !value.is_present() {
                return Ok(false);
            }
            let set = eval::in_subquery_values(select, catalog, storage)?;
            Ok(set.contains(&value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(alias: &str, column: &str, value: Value) -> Row {
        let mut values = HashMap::new();
        values.insert(format!("{alias}.{column}"), value);
        Row { values, slots: HashMap::new() }
    }

    #[test]
    fn sum_skips_absent_and_requires_all_int() {
        let values = vec![Value::Int(2), Value::Absent, Value::Int(3)];
        assert_eq!(sum(&values), AggValue::Int(5));
        assert_eq!(sum(&[Value::Absent, Value::Absent]), AggValue::Absent);
    }

    #[test]
    fn avg_rounds_to_two_decimals() {
        let values = vec![Value::Int(1), Value::Int(2)];
        assert_eq!(avg(&values), AggValue::Float(1.5));
        let values = vec![Value::Int(1), Value::Int(1), Value::Int(2)];
        match avg(&values) {
            AggValue::Float(f) => assert!((f - 1.33).abs() < 1e-9),
            other => panic!("expected Float, got {:?}", other),
        }
    }

    #[test]
    fn compute_groups_without_group_by_is_one_bucket_even_when_empty() {
        let groups = compute_groups(Vec::new(), &[]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].members.is_empty());
    }

    #[test]
    fn compute_groups_partitions_by_key() {
        let rows = vec![
            row("s", "age", Value::Int(20)),
            row("s", "age", Value::Int(21)),
            row("s", "age", Value::Int(20)),
        ];
        let group_by = vec![QualifiedName::qualified("s", "age")];
        let groups = compute_groups(rows, &group_by);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[1].members.len(), 1);
    }
}
