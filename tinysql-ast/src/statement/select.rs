use std::fmt;

use crate::condition::Condition;
use crate::expr::AggregateExpr;
use crate::table_ref::TableRef;
use crate::types::QualifiedName;
use crate::utils::display_comma_separated;

/// An `eq_cond`: exactly `ident.ident = ident.ident` (`spec.md` §4.2).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EqCond {
    /// The outer (already-bound) side's qualified column.
    pub left: QualifiedName,
    /// The newly-joined side's qualified column.
    pub right: QualifiedName,
}

impl fmt::Display for EqCond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.left, self.right)
    }
}

/// One `JOIN table_ref ON eq_cond` clause.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Join {
    /// The table being joined in.
    pub table: TableRef,
    /// Its equi-join condition against an already-bound alias.
    pub on: EqCond,
}

/// A single item in the `SELECT` list (`spec.md` §3's `ColumnItem`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnItem {
    /// A plain column reference, with an optional `AS` alias.
    Column(QualifiedName, Option<String>),
    /// An aggregate call, with an optional `AS` alias.
    Aggregate(AggregateExpr, Option<String>),
}

impl ColumnItem {
    /// The name this item is projected under: its alias if given, otherwise
    /// its natural textual form (`q.c`, `COUNT(*)`, ...).
    pub fn output_name(&self) -> String {
        match self {
            ColumnItem::Column(_, Some(alias)) => alias.clone(),
            ColumnItem::Column(col, None) => col.to_string(),
            ColumnItem::Aggregate(_, Some(alias)) => alias.clone(),
            ColumnItem::Aggregate(agg, None) => agg.to_string(),
        }
    }
}

/// The projection clause: `SELECT *` or `SELECT col_item, ...`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Projection {
    /// `SELECT *`
    All,
    /// `SELECT col_item, col_item, ...`
    Columns(Vec<ColumnItem>),
}

/// `ORDER BY` item: a column plus direction.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderByItem {
    /// The sort key.
    pub column: QualifiedName,
    /// `true` for `DESC`, `false` (the default) for `ASC`.
    pub descending: bool,
}

/// `SELECT select_list FROM table_ref (JOIN ...)* [WHERE ...] [GROUP BY ...]
/// [HAVING ...] [ORDER BY ...] [LIMIT n [OFFSET m]]` (`spec.md` §4.2).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectStmt {
    /// The projection clause.
    pub projection: Projection,
    /// The first `FROM` table.
    pub from: TableRef,
    /// Subsequent `JOIN` clauses, applied in source order.
    pub joins: Vec<Join>,
    /// The optional `WHERE` clause.
    pub filter: Option<Condition>,
    /// `GROUP BY` columns, if any.
    pub group_by: Vec<QualifiedName>,
    /// The optional `HAVING` clause.
    pub having: Option<Condition>,
    /// `ORDER BY` items, in source order.
    pub order_by: Vec<OrderByItem>,
    /// `LIMIT n`.
    pub limit: Option<i64>,
    /// `OFFSET m`.
    pub offset: Option<i64>,
}

impl fmt::Display for SelectStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        match &self.projection {
            Projection::All => f.write_str("*")?,
            Projection::Columns(items) => {
                let names: Vec<String> = items.iter().map(|i| i.output_name()).collect();
                f.write_str(&names.join(", "))?;
            }
        }
        write!(f, " FROM {}", self.from)?;
        for join in &self.joins {
            write!(f, " JOIN {} ON {}", join.table, join.on)?;
        }
        if let Some(filter) = &self.filter {
            write!(f, " WHERE {}", filter)?;
        }
        if !self.group_by.is_empty() {
            write!(f, " GROUP BY {}", display_comma_separated(&self.group_by))?;
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {}", having)?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            for (i, item) in self.order_by.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{} {}", item.column, if item.descending { "DESC" } else { "ASC" })?;
            }
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {}", offset)?;
        }
        Ok(())
    }
}
