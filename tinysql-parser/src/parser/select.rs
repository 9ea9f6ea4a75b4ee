use tinysql_ast::{
    ColumnItem, EqCond, Join, OrderByItem, Projection, QualifiedName, SelectStmt, TableRef,
};
use tinysql_lexer::{Keyword, Token};

use crate::error::ParseError;

use super::expr::aggregate_func_for;
use super::Parser;

impl Parser {
    /// `SELECT select_list FROM table_ref (JOIN table_ref ON eq_cond)*
    /// [WHERE cond] [GROUP BY col_list] [HAVING cond] [ORDER BY order_list]
    /// [LIMIT n [OFFSET m]]` (`spec.md` §4.2).
    pub(super) fn parse_select_stmt(&mut self) -> Result<SelectStmt, ParseError> {
        self.expect_keyword(Keyword::SELECT)?;
        let projection = self.parse_projection()?;
        self.expect_keyword(Keyword::FROM)?;
        let from = self.parse_table_ref()?;
        let joins = self.parse_joins()?;
        let filter = if self.parse_keyword(Keyword::WHERE) {
            Some(self.parse_condition()?)
        } else {
            None
        };
        let group_by = self.parse_group_by()?;
        let having = if self.parse_keyword(Keyword::HAVING) {
            Some(self.parse_condition()?)
        } else {
            None
        };
        let order_by = self.parse_order_by()?;
        let (limit, offset) = self.parse_limit_offset()?;
        Ok(SelectStmt {
            projection,
            from,
            joins,
            filter,
            group_by,
            having,
            order_by,
            limit,
            offset,
        })
    }

    fn parse_projection(&mut self) -> Result<Projection, ParseError> {
        if self.parse_token(&Token::Asterisk) {
            return Ok(Projection::All);
        }
        self.parse_comma_separated(Self::parse_column_item)
            .map(Projection::Columns)
    }

    fn parse_column_item(&mut self) -> Result<ColumnItem, ParseError> {
        if let Some(Token::Keyword(kw, _)) = self.peek_token() {
            if aggregate_func_for(kw).is_some() {
                let agg = self.parse_aggregate_expr()?;
                let alias = self.parse_optional_alias()?;
                return Ok(ColumnItem::Aggregate(agg, alias));
            }
        }
        let col = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        Ok(ColumnItem::Column(col, alias))
    }

    /// `['AS'] ident`, with `AS` optional, matching the `table_ref` grammar.
    fn parse_optional_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.parse_keyword(Keyword::AS) {
            return Ok(Some(self.expect_ident()?));
        }
        if let Some(Token::Ident(name)) = self.peek_token() {
            self.next_token();
            return Ok(Some(name));
        }
        Ok(None)
    }

    /// `table_ref : name [['AS'] alias] | '(' select ')' ['AS'] alias`.
    fn parse_table_ref(&mut self) -> Result<TableRef, ParseError> {
        if self.parse_token(&Token::LeftParen) {
            let select = self.parse_select_stmt()?;
            self.expect_token(&Token::RightParen)?;
            let alias = self
                .parse_optional_alias()?
                .ok_or_else(|| ParseError::from("a derived table requires an alias"))?;
            return Ok(TableRef::Derived(Box::new(select), alias));
        }
        let name = self.expect_ident()?;
        let alias = self.parse_optional_alias()?;
        Ok(TableRef::Named(name, alias))
    }

    fn parse_joins(&mut self) -> Result<Vec<Join>, ParseError> {
        let mut joins = Vec::new();
        while self.parse_keyword(Keyword::JOIN) {
            let table = self.parse_table_ref()?;
            self.expect_keyword(Keyword::ON)?;
            let on = self.parse_eq_cond()?;
            joins.push(Join { table, on });
        }
        Ok(joins)
    }

    /// `eq_cond : ident '.' ident '=' ident '.' ident` (`spec.md` §4.2).
    fn parse_eq_cond(&mut self) -> Result<EqCond, ParseError> {
        let left = self.parse_qualified_column_required()?;
        self.expect_token(&Token::Equal)?;
        let right = self.parse_qualified_column_required()?;
        Ok(EqCond { left, right })
    }

    fn parse_qualified_column_required(&mut self) -> Result<QualifiedName, ParseError> {
        let qualifier = self.expect_ident()?;
        self.expect_token(&Token::Period)?;
        let name = self.expect_ident()?;
        Ok(QualifiedName::qualified(qualifier, name))
    }

    fn parse_group_by(&mut self) -> Result<Vec<QualifiedName>, ParseError> {
        if self.parse_keywords(&[Keyword::GROUP, Keyword::BY]) {
            self.parse_comma_separated(Self::parse_qualified_name)
        } else {
            Ok(Vec::new())
        }
    }

    fn parse_order_by(&mut self) -> Result<Vec<OrderByItem>, ParseError> {
        if self.parse_keywords(&[Keyword::ORDER, Keyword::BY]) {
            self.parse_comma_separated(Self::parse_order_by_item)
        } else {
            Ok(Vec::new())
        }
    }

    fn parse_order_by_item(&mut self) -> Result<OrderByItem, ParseError> {
        let column = self.parse_qualified_name()?;
        let descending = if self.parse_keyword(Keyword::DESC) {
            true
        } else {
            self.parse_keyword(Keyword::ASC);
            false
        };
        Ok(OrderByItem { column, descending })
    }

    fn parse_limit_offset(&mut self) -> Result<(Option<i64>, Option<i64>), ParseError> {
        let limit = if self.parse_keyword(Keyword::LIMIT) {
            Some(self.expect_number()?)
        } else {
            None
        };
        let offset = if self.parse_keyword(Keyword::OFFSET) {
            Some(self.expect_number()?)
        } else {
            None
        };
        Ok((limit, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use tinysql_ast::{Projection, Statement, TableRef};

    fn select(sql: &str) -> tinysql_ast::SelectStmt {
        match parse(sql).unwrap() {
            Statement::Select(select) => select,
            other => panic!("expected a SELECT, got {:?}", other),
        }
    }

    #[test]
    fn star_projection() {
        assert_eq!(select("SELECT * FROM s").projection, Projection::All);
    }

    #[test]
    fn joins_and_table_aliases() {
        let stmt = select("SELECT s.name FROM students s JOIN enrollments e ON s.id = e.sid");
        assert_eq!(stmt.from, TableRef::Named("students".into(), Some("s".into())));
        assert_eq!(stmt.joins.len(), 1);
        assert_eq!(stmt.joins[0].table.alias(), "e");
    }

    #[test]
    fn derived_table_requires_an_alias() {
        let err = parse("SELECT * FROM (SELECT * FROM s)").unwrap_err();
        assert!(matches!(err, crate::ParseError::ParseError(_)));
    }

    #[test]
    fn group_by_having_order_by_limit_offset() {
        let stmt = select(
            "SELECT age, COUNT(*) FROM s GROUP BY age HAVING COUNT(*) >= 1 ORDER BY age DESC LIMIT 2 OFFSET 1",
        );
        assert_eq!(stmt.group_by.len(), 1);
        assert!(stmt.having.is_some());
        assert_eq!(stmt.order_by.len(), 1);
        assert!(stmt.order_by[0].descending);
        assert_eq!(stmt.limit, Some(2));
        assert_eq!(stmt.offset, Some(1));
    }
}
