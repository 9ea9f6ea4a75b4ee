use std::fmt;

use crate::types::QualifiedName;

/// An aggregate function name (`spec.md` §4.2).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AggregateFunc {
    /// `COUNT`
    Count,
    /// `SUM`
    Sum,
    /// `AVG`
    Avg,
    /// `MIN`
    Min,
    /// `MAX`
    Max,
}

impl fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
        })
    }
}

/// The argument of an aggregate call: either `*` (only valid for `COUNT`) or
/// a single column reference.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AggregateArg {
    /// `COUNT(*)`
    Star,
    /// `COUNT(col)`, `SUM(col)`, etc.
    Column(QualifiedName),
}

impl fmt::Display for AggregateArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateArg::Star => f.write_str("*"),
            AggregateArg::Column(col) => write!(f, "{}", col),
        }
    }
}

/// An aggregate call, e.g. `COUNT(*)` or `SUM(c.credits)`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateExpr {
    /// The function being applied.
    pub func: AggregateFunc,
    /// The argument it is applied to.
    pub arg: AggregateArg,
}

impl fmt::Display for AggregateExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.func, self.arg)
    }
}

/// A scalar expression (`spec.md` §3's `Expr` node family).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// A column reference, qualified or not.
    Column(QualifiedName),
    /// An integer literal.
    IntLit(i64),
    /// A string literal.
    StrLit(String),
    /// An aggregate call; only legal in a projection or `HAVING`.
    Aggregate(AggregateExpr),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(col) => write!(f, "{}", col),
            Expr::IntLit(n) => write!(f, "{}", n),
            Expr::StrLit(s) => write!(f, "'{}'", s),
            Expr::Aggregate(agg) => write!(f, "{}", agg),
        }
    }
}

/// A comparison operator (`spec.md` §6).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=` or `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `LIKE`, with SQL-style `%`/`_` wildcards.
    Like,
}

impl CompareOp {
    /// True for the (in)equality family `=`, `!=`/`<>`.
    pub fn is_equality(&self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::NotEq)
    }

    /// True for the ordering family `<`, `<=`, `>`, `>=`.
    pub fn is_ordering(&self) -> bool {
        matches!(self, CompareOp::Lt | CompareOp::LtEq | CompareOp::Gt | CompareOp::GtEq)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
            CompareOp::Like => "LIKE",
        })
    }
}
