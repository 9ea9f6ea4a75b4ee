use std::fmt;

/// Above this product of cardinalities, a join always uses a hash-join
/// (`spec.md` §4.4 rule 1).
const HASH_JOIN_THRESHOLD: u128 = 10_000_000;

/// Above this single-side cardinality (with no applicable index), a join
/// falls back to sort-merge instead of nested-loop (`spec.md` §4.4 rule 4;
/// the spec does not fix this constant, so it is a documented choice —
/// see `DESIGN.md`).
const SORT_MERGE_THRESHOLD: u64 = 1_000;

/// Which join algorithm the executor must use for one join edge
/// (`spec.md` §4.4, §4.5).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum JoinMethod {
    /// Build a hash table on the smaller side, probe with the other.
    HashJoin,
    /// Point-lookup the inner side's index per outer row.
    IndexNestedLoop,
    /// Sort both sides by join key, then merge equal-key runs.
    SortMerge,
    /// Scan the inner side in full for every outer row.
    NestedLoop,
}

impl fmt::Display for JoinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinMethod::HashJoin => "hash-join",
            JoinMethod::IndexNestedLoop => "index-nested-loop",
            JoinMethod::SortMerge => "sort-merge",
            JoinMethod::NestedLoop => "nested-loop",
        })
    }
}

/// The chosen plan for one `JOIN` edge (`spec.md` §4.4): which algorithm,
/// which side plays outer/inner, and whether that is a swap of the
/// source-order `ON` clause's sides. The executor must respect this
/// verbatim, never reconsidering the choice.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinPlan {
    /// The chosen algorithm.
    pub method: JoinMethod,
    /// The outer relation's alias.
    pub outer: String,
    /// The inner relation's alias.
    pub inner: String,
    /// The join key column on the outer side.
    pub outer_column: String,
    /// The join key column on the inner side.
    pub inner_column: String,
    /// `true` if outer/inner were swapped relative to the `ON` clause's
    /// source-order `left`/`right` sides.
    pub swapped: bool,
}

/// Chooses a join algorithm and orientation for one edge, given each
/// side's estimated cardinality and whether its join key is indexed
/// (`spec.md` §4.4's four-rule procedure). `left`/`right` and their
/// cardinalities/index flags are in source `ON` clause order; the
/// returned plan's `outer`/`inner` may swap them.
#[allow(clippy::too_many_arguments)]
pub fn choose_join_strategy(
    left_alias: &str,
    left_column: &str,
    left_card: u64,
    left_indexed: bool,
    right_alias: &str,
    right_column: &str,
    right_card: u64,
    right_indexed: bool,
) -> JoinPlan {
    let side = |outer: &str, outer_col: &str, inner: &str, inner_col: &str, swapped: bool, method: JoinMethod| {
        JoinPlan {
            method,
            outer: outer.to_string(),
            inner: inner.to_string(),
            outer_column: outer_col.to_string(),
            inner_column: inner_col.to_string(),
            swapped,
        }
    };

    let product = left_card as u128 * right_card as u128;
    if product > HASH_JOIN_THRESHOLD {
        // Rule 1: hash-join, smaller side builds (treated as "inner").
        return if left_card <= right_card {
            side(right_alias, right_column, left_alias, left_column, true, JoinMethod::HashJoin)
        } else {
            side(left_alias, left_column, right_alias, right_column, false, JoinMethod::HashJoin)
        };
    }

    if right_indexed && left_card <= right_card {
        // Rule 2: index on the inner join key, smaller side outer.
        return side(left_alias, left_column, right_alias, right_column, false, JoinMethod::IndexNestedLoop);
    }

    if left_indexed && right_card < left_card {
        // Rule 3: index on the outer join key; swap so it becomes the inner.
        return side(right_alias, right_column, left_alias, left_column, true, JoinMethod::IndexNestedLoop);
    }

    // Rule 4: sort-merge for large inputs, nested-loop otherwise.
    let method = if left_card.max(right_card) > SORT_MERGE_THRESHOLD {
        JoinMethod::SortMerge
    } else {
        JoinMethod::NestedLoop
    };
    side(left_alias, left_column, right_alias, right_column, false, method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_cardinalities_choose_hash_join_with_smaller_build_side() {
        let plan = choose_join_strategy("a", "x", 10_000, false, "b", "y", 2_000, false);
        assert_eq!(plan.method, JoinMethod::HashJoin);
        assert_eq!(plan.inner, "b");
        assert!(plan.swapped);
    }

    #[test]
    fn indexed_inner_with_smaller_outer_chooses_index_nested_loop() {
        let plan = choose_join_strategy("a", "x", 5, true, "b", "y", 100, true);
        assert_eq!(plan.method, JoinMethod::IndexNestedLoop);
        assert_eq!(plan.outer, "a");
        assert_eq!(plan.inner, "b");
        assert!(!plan.swapped);
    }

    #[test]
    fn indexed_outer_with_smaller_inner_swaps_to_index_nested_loop() {
        let plan = choose_join_strategy("a", "x", 100, true, "b", "y", 5, false);
        assert_eq!(plan.method, JoinMethod::IndexNestedLoop);
        assert_eq!(plan.outer, "b");
        assert_eq!(plan.inner, "a");
        assert!(plan.swapped);
    }

    #[test]
    fn small_unindexed_sides_choose_nested_loop() {
        let plan = choose_join_strategy("a", "x", 3, false, "b", "y", 4, false);
        assert_eq!(plan.method, JoinMethod::NestedLoop);
    }

    #[test]
    fn large_unindexed_sides_choose_sort_merge() {
        let plan = choose_join_strategy("a", "x", 2_000, false, "b", "y", 3_000, false);
        assert_eq!(plan.method, JoinMethod::SortMerge);
    }
}
