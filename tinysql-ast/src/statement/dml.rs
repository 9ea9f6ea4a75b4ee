use std::fmt;

use crate::condition::Condition;
use crate::expr::Expr;
use crate::utils::display_comma_separated;

/// `INSERT INTO name [(col_list)] VALUES (expr_list)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertStmt {
    /// The target table.
    pub table: String,
    /// The explicit column list, or `None` for the full-row positional form.
    pub columns: Option<Vec<String>>,
    /// The literal values being inserted, one per column.
    pub values: Vec<Expr>,
}

impl fmt::Display for InsertStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {} ", self.table)?;
        if let Some(cols) = &self.columns {
            write!(f, "({}) ", cols.join(", "))?;
        }
        write!(f, "VALUES ({})", display_comma_separated(&self.values))
    }
}

/// `UPDATE name SET set_list [WHERE cond]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateStmt {
    /// The target table.
    pub table: String,
    /// `column = expr` assignments, in source order.
    pub assignments: Vec<(String, Expr)>,
    /// The optional `WHERE` clause.
    pub filter: Option<Condition>,
}

impl fmt::Display for UpdateStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} SET ", self.table)?;
        for (i, (col, expr)) in self.assignments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", col, expr)?;
        }
        if let Some(filter) = &self.filter {
            write!(f, " WHERE {}", filter)?;
        }
        Ok(())
    }
}

/// `DELETE FROM name [WHERE cond]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeleteStmt {
    /// The target table.
    pub table: String,
    /// The optional `WHERE` clause.
    pub filter: Option<Condition>,
}

impl fmt::Display for DeleteStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.table)?;
        if let Some(filter) = &self.filter {
            write!(f, " WHERE {}", filter)?;
        }
        Ok(())
    }
}
