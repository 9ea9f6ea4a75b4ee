use tinysql_ast::Condition;

use crate::join::JoinPlan;
use crate::pushdown::Pushdown;

/// One base-table scan's cost/row estimate, purely informational
/// (`spec.md` §4.4's `execution_plan` summary).
#[derive(Clone, Debug, PartialEq)]
pub struct ScanEstimate {
    /// The `FROM`/`JOIN` alias being scanned.
    pub alias: String,
    /// The underlying table name.
    pub table: String,
    /// The table's full row count before any predicate is applied.
    pub base_rows: u64,
    /// The combined selectivity of the predicate pushed down to this scan.
    pub selectivity: f64,
    /// `base_rows * selectivity`.
    pub estimated_rows: f64,
}

/// One join edge's estimate, paired with the strategy chosen for it.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinEstimate {
    /// The chosen join plan.
    pub join: JoinPlan,
    /// The estimated number of rows the join edge emits.
    pub estimated_rows: f64,
}

/// The informational cost/row-estimate summary attached to a [`PlanTree`]
/// (`spec.md` §4.4: "purely informational"). Never consulted by the
/// executor to change behavior, only to explain the plan it was handed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutionPlanSummary {
    /// One entry per base-table scan, in alias order.
    pub scans: Vec<ScanEstimate>,
    /// One entry per join edge, in source `JOIN` order.
    pub joins: Vec<JoinEstimate>,
}

/// A validated `SELECT` annotated with the optimizer's decisions
/// (`spec.md` §4.4): the reordered `WHERE` tree, its push-down split, the
/// chosen strategy for every join edge, and an informational cost
/// summary. The executor consumes this instead of re-deriving any of it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanTree {
    /// The top-level `WHERE` tree with its `AND` chain reordered by
    /// selectivity (`None` if there was no `WHERE`).
    pub filter: Option<Condition>,
    /// `filter`'s split into per-alias scan predicates and a post-join
    /// remainder.
    pub pushdown: Pushdown,
    /// The chosen strategy for each join edge, in source `JOIN` order.
    pub joins: Vec<JoinPlan>,
    /// The informational cost/row-estimate summary.
    pub execution_plan: ExecutionPlanSummary,
}
