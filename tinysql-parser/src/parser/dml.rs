use tinysql_ast::{DeleteStmt, Expr, InsertStmt, UpdateStmt};
use tinysql_lexer::{Keyword, Token};

use crate::error::ParseError;

use super::Parser;

impl Parser {
    /// `INSERT INTO name ['(' col_list ')'] VALUES '(' expr_list ')'`.
    pub(super) fn parse_insert(&mut self) -> Result<InsertStmt, ParseError> {
        self.expect_keyword(Keyword::INSERT)?;
        self.expect_keyword(Keyword::INTO)?;
        let table = self.expect_ident()?;
        let columns = if self.parse_token(&Token::LeftParen) {
            let cols = self.parse_comma_separated(Self::expect_ident)?;
            self.expect_token(&Token::RightParen)?;
            Some(cols)
        } else {
            None
        };
        self.expect_keyword(Keyword::VALUES)?;
        self.expect_token(&Token::LeftParen)?;
        let values = self.parse_comma_separated(Self::parse_expr)?;
        self.expect_token(&Token::RightParen)?;
        Ok(InsertStmt {
            table,
            columns,
            values,
        })
    }

    /// `UPDATE name SET set_list ['WHERE' cond]`.
    pub(super) fn parse_update(&mut self) -> Result<UpdateStmt, ParseError> {
        self.expect_keyword(Keyword::UPDATE)?;
        let table = self.expect_ident()?;
        self.expect_keyword(Keyword::SET)?;
        let assignments = self.parse_comma_separated(Self::parse_assignment)?;
        let filter = if self.parse_keyword(Keyword::WHERE) {
            Some(self.parse_condition()?)
        } else {
            None
        };
        Ok(UpdateStmt {
            table,
            assignments,
            filter,
        })
    }

    fn parse_assignment(&mut self) -> Result<(String, Expr), ParseError> {
        let column = self.expect_ident()?;
        self.expect_token(&Token::Equal)?;
        let value = self.parse_expr()?;
        Ok((column, value))
    }

    /// `DELETE FROM name ['WHERE' cond]`.
    pub(super) fn parse_delete(&mut self) -> Result<DeleteStmt, ParseError> {
        self.expect_keyword(Keyword::DELETE)?;
        self.expect_keyword(Keyword::FROM)?;
        let table = self.expect_ident()?;
        let filter = if self.parse_keyword(Keyword::WHERE) {
            Some(self.parse_condition()?)
        } else {
            None
        };
        Ok(DeleteStmt { table, filter })
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use tinysql_ast::{Expr, Statement};

    #[test]
    fn insert_with_explicit_column_list() {
        let stmt = match parse("INSERT INTO s (id, name) VALUES (1, 'Jane')").unwrap() {
            Statement::Insert(stmt) => stmt,
            other => panic!("expected an INSERT, got {:?}", other),
        };
        assert_eq!(stmt.columns, Some(vec!["id".into(), "name".into()]));
        assert_eq!(stmt.values, vec![Expr::IntLit(1), Expr::StrLit("Jane".into())]);
    }

    #[test]
    fn insert_full_row_form_has_no_column_list() {
        let stmt = match parse("INSERT INTO s VALUES (1, 'Jane', 20)").unwrap() {
            Statement::Insert(stmt) => stmt,
            other => panic!("expected an INSERT, got {:?}", other),
        };
        assert_eq!(stmt.columns, None);
        assert_eq!(stmt.values.len(), 3);
    }

    #[test]
    fn update_with_where() {
        let stmt = match parse("UPDATE s SET age = 21 WHERE id = 1").unwrap() {
            Statement::Update(stmt) => stmt,
            other => panic!("expected an UPDATE, got {:?}", other),
        };
        assert_eq!(stmt.assignments, vec![("age".to_string(), Expr::IntLit(21))]);
        assert!(stmt.filter.is_some());
    }

    #[test]
    fn delete_without_where_matches_everything() {
        let stmt = match parse("DELETE FROM s").unwrap() {
            Statement::Delete(stmt) => stmt,
            other => panic!("expected a DELETE, got {:?}", other),
        };
        assert!(stmt.filter.is_none());
    }
}
