use tinysql_ast::{
    AggregateArg, AggregateExpr, AggregateFunc, CompareOp, Condition, Expr, QualifiedName,
};
use tinysql_lexer::{Keyword, Token};

use crate::error::{parse_error, ParseError};

use super::Parser;

/// Resolves a keyword to its aggregate function, if it names one.
pub(super) fn aggregate_func_for(keyword: Keyword) -> Option<AggregateFunc> {
    match keyword {
        Keyword::COUNT => Some(AggregateFunc::Count),
        Keyword::SUM => Some(AggregateFunc::Sum),
        Keyword::AVG => Some(AggregateFunc::Avg),
        Keyword::MIN => Some(AggregateFunc::Min),
        Keyword::MAX => Some(AggregateFunc::Max),
        _ => None,
    }
}

impl Parser {
    /// `cond : or_cond`, the entry point for `WHERE`/`HAVING`/parenthesized
    /// sub-conditions (`spec.md` §4.2: `OR` < `AND` < comparison).
    pub(super) fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        self.parse_or_condition()
    }

    fn parse_or_condition(&mut self) -> Result<Condition, ParseError> {
        let mut left = self.parse_and_condition()?;
        while self.parse_keyword(Keyword::OR) {
            let right = self.parse_and_condition()?;
            left = Condition::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and_condition(&mut self) -> Result<Condition, ParseError> {
        let mut left = self.parse_condition_primary()?;
        while self.parse_keyword(Keyword::AND) {
            let right = self.parse_condition_primary()?;
            left = Condition::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// A parenthesized condition (always groups), an `expr IN (SELECT ...)`,
    /// or a plain `expr op expr` comparison.
    fn parse_condition_primary(&mut self) -> Result<Condition, ParseError> {
        if self.parse_token(&Token::LeftParen) {
            let inner = self.parse_condition()?;
            self.expect_token(&Token::RightParen)?;
            return Ok(inner);
        }

        let left = self.parse_expr()?;
        if self.parse_keyword(Keyword::IN) {
            self.expect_token(&Token::LeftParen)?;
            let select = self.parse_select_stmt()?;
            self.expect_token(&Token::RightParen)?;
            return Ok(Condition::InSubquery(left, Box::new(select)));
        }

        let op = self.parse_compare_op()?;
        let right = self.parse_expr()?;
        Ok(Condition::Comparison(left, op, right))
    }

    fn parse_compare_op(&mut self) -> Result<CompareOp, ParseError> {
        match self.next_token() {
            Some(Token::Equal) => Ok(CompareOp::Eq),
            Some(Token::NotEqual) => Ok(CompareOp::NotEq),
            Some(Token::LessThan) => Ok(CompareOp::Lt),
            Some(Token::LessThanOrEqual) => Ok(CompareOp::LtEq),
            Some(Token::GreaterThan) => Ok(CompareOp::Gt),
            Some(Token::GreaterThanOrEqual) => Ok(CompareOp::GtEq),
            Some(Token::Keyword(Keyword::LIKE, _)) => Ok(CompareOp::Like),
            Some(other) => parse_error(format!("expected a comparison operator, found `{}`", other)),
            None => parse_error("expected a comparison operator, found end of input"),
        }
    }

    /// `expr : column | int_lit | str_lit | aggregate` (`spec.md` §3).
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        match self.peek_token() {
            Some(Token::Number(n)) => {
                self.next_token();
                Ok(Expr::IntLit(n))
            }
            Some(Token::String(s)) => {
                self.next_token();
                Ok(Expr::StrLit(s))
            }
            Some(Token::Keyword(kw, _)) if aggregate_func_for(kw).is_some() => {
                self.parse_aggregate_expr().map(Expr::Aggregate)
            }
            Some(Token::Ident(_)) => self.parse_qualified_name().map(Expr::Column),
            Some(other) => parse_error(format!("expected an expression, found `{}`", other)),
            None => parse_error("expected an expression, found end of input"),
        }
    }

    pub(super) fn parse_aggregate_expr(&mut self) -> Result<AggregateExpr, ParseError> {
        let func = match self.next_token() {
            Some(Token::Keyword(kw, _)) if aggregate_func_for(kw).is_some() => {
                aggregate_func_for(kw).expect("checked by the guard above")
            }
            Some(other) => return parse_error(format!("expected an aggregate function, found `{}`", other)),
            None => return parse_error("expected an aggregate function, found end of input"),
        };
        self.expect_token(&Token::LeftParen)?;
        let arg = if self.parse_token(&Token::Asterisk) {
            if !matches!(func, AggregateFunc::Count) {
                return parse_error("`*` is only a valid argument to COUNT");
            }
            AggregateArg::Star
        } else {
            AggregateArg::Column(self.parse_qualified_name()?)
        };
        self.expect_token(&Token::RightParen)?;
        Ok(AggregateExpr { func, arg })
    }

    /// `qualified_name : ident ['.' ident]`.
    pub(super) fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let first = self.expect_ident()?;
        if self.parse_token(&Token::Period) {
            let second = self.expect_ident()?;
            Ok(QualifiedName::qualified(first, second))
        } else {
            Ok(QualifiedName::unqualified(first))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use tinysql_ast::{CompareOp, Condition, Statement};

    fn filter(sql: &str) -> Condition {
        match parse(sql).unwrap() {
            Statement::Select(select) => select.filter.unwrap(),
            other => panic!("expected a SELECT, got {:?}", other),
        }
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let cond = filter("SELECT * FROM t WHERE a = 1 OR b = 2 AND c = 3");
        match cond {
            Condition::Or(left, right) => {
                assert!(matches!(*left, Condition::Comparison(..)));
                assert!(matches!(*right, Condition::And(..)));
            }
            other => panic!("expected an OR at the top, got {:?}", other),
        }
    }

    #[test]
    fn parens_override_precedence() {
        let cond = filter("SELECT * FROM t WHERE (a = 1 OR b = 2) AND c = 3");
        assert!(matches!(cond, Condition::And(..)));
    }

    #[test]
    fn in_subquery_parses() {
        let cond = filter("SELECT * FROM t WHERE a IN (SELECT b FROM u)");
        assert!(matches!(cond, Condition::InSubquery(..)));
    }

    #[test]
    fn like_is_a_comparison_operator() {
        let cond = filter("SELECT * FROM t WHERE name LIKE 'A%'");
        match cond {
            Condition::Comparison(_, CompareOp::Like, _) => {}
            other => panic!("expected a LIKE comparison, got {:?}", other),
        }
    }
}
