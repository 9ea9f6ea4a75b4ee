use std::collections::{HashMap, HashSet};

use tinysql_ast::Condition;

/// The `WHERE` tree split into per-alias scan predicates and a post-join
/// remainder (`spec.md` §4.4's predicate push-down). A leaf that
/// references no single alias exclusively — including any `OR` that
/// straddles tables — stays in `post_join`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pushdown {
    /// Per-alias conjunctions to apply at that alias's base-table scan.
    pub per_alias: HashMap<String, Condition>,
    /// Whatever remains to apply after all joins have run.
    pub post_join: Option<Condition>,
}

/// Splits `cond`'s top-level `AND` chain by alias reference (`spec.md`
/// §4.4). Each leaf is tested independently; a leaf referencing exactly
/// one alias is pushed to that alias's scan, everything else (including
/// leaves naming zero or multiple aliases) is applied after the join.
pub fn split(cond: &Condition) -> Pushdown {
    let mut per_alias: HashMap<String, Vec<Condition>> = HashMap::new();
    let mut post_join_leaves: Vec<Condition> = Vec::new();

    for leaf in cond.and_leaves() {
        let mut referenced = Vec::new();
        tinysql_validator::referenced_aliases(leaf, &mut referenced);
        let unique: HashSet<String> = referenced.into_iter().collect();
        if unique.len() == 1 {
            let alias = unique.into_iter().next().expect("len == 1");
            per_alias.entry(alias).or_default().push(leaf.clone());
        } else {
            post_join_leaves.push(leaf.clone());
        }
    }

    let per_alias = per_alias
        .into_iter()
        .map(|(alias, leaves)| {
            let chain = Condition::and_chain(leaves).expect("at least one leaf per alias entry");
            (alias, chain)
        })
        .collect();
    let post_join = Condition::and_chain(post_join_leaves);

    Pushdown { per_alias, post_join }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinysql_ast::{CompareOp, Expr, QualifiedName};

    fn cmp(qualifier: &str, column: &str, value: i64) -> Condition {
        Condition::Comparison(
            Expr::Column(QualifiedName::qualified(qualifier, column)),
            CompareOp::Eq,
            Expr::IntLit(value),
        )
    }

    #[test]
    fn single_alias_leaves_are_pushed_down() {
        let cond = Condition::And(Box::new(cmp("s", "age", 20)), Box::new(cmp("e", "grade", 1)));
        let split = split(&cond);
        assert_eq!(split.per_alias.len(), 2);
        assert!(split.post_join.is_none());
    }

    #[test]
    fn cross_alias_comparison_stays_post_join() {
        let cross = Condition::Comparison(
            Expr::Column(QualifiedName::qualified("s", "id")),
            CompareOp::Eq,
            Expr::Column(QualifiedName::qualified("e", "sid")),
        );
        let cond = Condition::And(Box::new(cmp("s", "age", 20)), Box::new(cross));
        let split = split(&cond);
        assert_eq!(split.per_alias.len(), 1);
        assert!(split.post_join.is_some());
    }
}
