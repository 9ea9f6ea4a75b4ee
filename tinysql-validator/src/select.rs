use tinysql_ast::{ColumnItem, Condition, Expr, Projection, QualifiedName, SelectStmt};
use tinysql_catalog::Catalog;

use crate::error::ValidationError;
use crate::scope::{build_alias_map, AliasMap};

/// Validates a `SELECT` end to end (`spec.md` §4.3): builds its alias map,
/// resolves every column reference in every clause, and recurses into
/// `JOIN ... ON`, `IN (subquery)`, and derived-table subqueries.
pub fn validate_select(select: &SelectStmt, catalog: &dyn Catalog) -> Result<AliasMap, ValidationError> {
    let aliases = build_alias_map(select, catalog)?;

    match &select.projection {
        Projection::All => {}
        Projection::Columns(items) => {
            for item in items {
                match item {
                    ColumnItem::Column(col, _) => aliases.resolve(col)?,
                    ColumnItem::Aggregate(agg, _) => resolve_aggregate_arg(agg, &aliases)?,
                }
            }
        }
    }

    for join in &select.joins {
        aliases.resolve(&join.on.left)?;
        aliases.resolve(&join.on.right)?;
    }

    if let Some(filter) = &select.filter {
        resolve_condition(filter, &aliases, catalog)?;
    }
    for col in &select.group_by {
        aliases.resolve(col)?;
    }
    if let Some(having) = &select.having {
        resolve_condition(having, &aliases, catalog)?;
    }
    for item in &select.order_by {
        aliases.resolve(&item.column)?;
    }

    Ok(aliases)
}

fn resolve_aggregate_arg(
    agg: &tinysql_ast::AggregateExpr,
    aliases: &AliasMap,
) -> Result<(), ValidationError> {
    match &agg.arg {
        tinysql_ast::AggregateArg::Star => Ok(()),
        tinysql_ast::AggregateArg::Column(col) => aliases.resolve(col),
    }
}

fn resolve_expr(expr: &Expr, aliases: &AliasMap) -> Result<(), ValidationError> {
    match expr {
        Expr::Column(col) => aliases.resolve(col),
        Expr::IntLit(_) | Expr::StrLit(_) => Ok(()),
        Expr::Aggregate(agg) => resolve_aggregate_arg(agg, aliases),
    }
}

fn resolve_condition(
    cond: &Condition,
    aliases: &AliasMap,
    catalog: &dyn Catalog,
) -> Result<(), ValidationError> {
    match cond {
        Condition::Comparison(l, _, r) => {
            resolve_expr(l, aliases)?;
            resolve_expr(r, aliases)
        }
        Condition::And(l, r) | Condition::Or(l, r) => {
            resolve_condition(l, aliases, catalog)?;
            resolve_condition(r, aliases, catalog)
        }
        Condition::InSubquery(expr, select) => {
            resolve_expr(expr, aliases)?;
            validate_select(select, catalog).map(|_| ())
        }
    }
}

/// Every alias referenced by `cond`, used by the optimizer's push-down
/// split (kept here since it walks the same `Condition` tree shape the
/// validator already knows how to traverse).
pub fn referenced_aliases(cond: &Condition, out: &mut Vec<String>) {
    fn expr_alias(expr: &Expr, out: &mut Vec<String>) {
        let col = match expr {
            Expr::Column(c) => Some(c),
            Expr::Aggregate(a) => match &a.arg {
                tinysql_ast::AggregateArg::Column(c) => Some(c),
                tinysql_ast::AggregateArg::Star => None,
            },
            _ => None,
        };
        if let Some(QualifiedName { qualifier: Some(q), .. }) = col {
            out.push(q.clone());
        }
    }
    match cond {
        Condition::Comparison(l, _, r) => {
            expr_alias(l, out);
            expr_alias(r, out);
        }
        Condition::And(l, r) | Condition::Or(l, r) => {
            referenced_aliases(l, out);
            referenced_aliases(r, out);
        }
        Condition::InSubquery(expr, _) => expr_alias(expr, out),
    }
}
