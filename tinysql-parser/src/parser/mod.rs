mod ddl;
mod dml;
mod expr;
mod select;

use tinysql_ast::Statement;
use tinysql_lexer::{Keyword, Lexer, Token};

use crate::error::{parse_error, ParseError};
use crate::peek::{MultiPeek, PeekIteratorExt};

/// Parses a single SQL statement (`spec.md` §4.2).
///
/// Tokenizes `sql` in full, then parses the resulting token stream once.
/// Trailing whitespace and a single trailing `;` are accepted, but anything
/// else left over after the statement is a [`ParseError`].
pub fn parse(sql: &str) -> Result<Statement, ParseError> {
    let tokens = Lexer::new(sql).tokenize()?;
    let mut parser = Parser::new(tokens);
    let stmt = parser.parse_statement()?;
    parser.expect_end()?;
    Ok(stmt)
}

/// Turns a token stream into AST nodes, one grammar production at a time.
///
/// Grounded on the teacher's `Parser` wrapping a [`MultiPeek`] of tokens
/// (`usql-parser`'s core), generalized from its per-dialect generic
/// parameter down to the single fixed grammar this crate parses. Grammar
/// productions live in sibling modules (`ddl`, `dml`, `select`, `expr`),
/// each as a separate `impl Parser` block.
pub(crate) struct Parser {
    tokens: MultiPeek<std::vec::IntoIter<Token>>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().multipeek(),
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.peek_token() {
            Some(Token::Keyword(Keyword::CREATE, _)) => self.parse_create(),
            Some(Token::Keyword(Keyword::DROP, _)) => self.parse_drop(),
            Some(Token::Keyword(Keyword::SELECT, _)) => {
                self.parse_select_stmt().map(Statement::Select)
            }
            Some(Token::Keyword(Keyword::INSERT, _)) => self.parse_insert().map(Statement::Insert),
            Some(Token::Keyword(Keyword::UPDATE, _)) => self.parse_update().map(Statement::Update),
            Some(Token::Keyword(Keyword::DELETE, _)) => self.parse_delete().map(Statement::Delete),
            Some(Token::Keyword(Keyword::SHOW, _)) => self.parse_show_tables(),
            Some(Token::Keyword(Keyword::DESCRIBE, _)) => self.parse_describe(),
            Some(other) => parse_error(format!("unexpected token `{}`", other)),
            None => parse_error("unexpected end of input"),
        }
    }

    fn parse_show_tables(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::SHOW)?;
        self.expect_keyword(Keyword::TABLES)?;
        Ok(Statement::ShowTables(tinysql_ast::ShowTablesStmt))
    }

    fn parse_describe(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::DESCRIBE)?;
        let table = self.expect_ident()?;
        Ok(Statement::Describe(tinysql_ast::DescribeStmt { table }))
    }

    /// Consumes an optional trailing `;`, then requires nothing remains.
    fn expect_end(&mut self) -> Result<(), ParseError> {
        self.parse_token(&Token::SemiColon);
        match self.next_token() {
            None => Ok(()),
            Some(tok) => parse_error(format!("unexpected trailing token `{}`", tok)),
        }
    }

    // --- token-stream helpers, grounded on the teacher's Parser ---

    fn peek_token(&mut self) -> Option<Token> {
        self.tokens.peek().cloned()
    }

    fn next_token(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    /// Consumes the next token if it equals `expected`.
    fn parse_token(&mut self, expected: &Token) -> bool {
        self.tokens.next_if_eq(expected).is_some()
    }

    fn expect_token(&mut self, expected: &Token) -> Result<(), ParseError> {
        if self.parse_token(expected) {
            Ok(())
        } else {
            match self.peek_token() {
                Some(tok) => parse_error(format!("expected `{}`, found `{}`", expected, tok)),
                None => parse_error(format!("expected `{}`, found end of input", expected)),
            }
        }
    }

    /// Consumes the next token if it is `keyword`.
    fn parse_keyword(&mut self, keyword: Keyword) -> bool {
        match self.peek_token() {
            Some(tok) if tok.is_keyword(keyword) => {
                self.next_token();
                true
            }
            _ => false,
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.parse_keyword(keyword) {
            Ok(())
        } else {
            match self.peek_token() {
                Some(tok) => parse_error(format!("expected {}, found `{}`", keyword, tok)),
                None => parse_error(format!("expected {}, found end of input", keyword)),
            }
        }
    }

    /// Consumes an entire run of keywords in order, or consumes none of them.
    fn parse_keywords(&mut self, keywords: &[Keyword]) -> bool {
        self.tokens.reset_cursor();
        for keyword in keywords {
            match self.tokens.peek_next() {
                Some(tok) if tok.is_keyword(*keyword) => continue,
                _ => {
                    self.tokens.reset_cursor();
                    return false;
                }
            }
        }
        self.tokens.reset_cursor();
        for _ in keywords {
            self.next_token();
        }
        true
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.next_token() {
            Some(Token::Ident(name)) => Ok(name),
            Some(other) => parse_error(format!("expected an identifier, found `{}`", other)),
            None => parse_error("expected an identifier, found end of input"),
        }
    }

    fn expect_number(&mut self) -> Result<i64, ParseError> {
        match self.next_token() {
            Some(Token::Number(n)) => Ok(n),
            Some(other) => parse_error(format!("expected a number, found `{}`", other)),
            None => parse_error("expected a number, found end of input"),
        }
    }

    /// Parses one or more comma-separated items via `f`.
    fn parse_comma_separated<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![f(self)?];
        while self.parse_token(&Token::Comma) {
            items.push(f(self)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_trailing_garbage_after_a_statement() {
        let err = parse("SHOW TABLES extra").unwrap_err();
        assert!(matches!(err, ParseError::ParseError(_)));
    }

    #[test]
    fn accepts_an_optional_trailing_semicolon() {
        assert!(parse("SHOW TABLES;").is_ok());
        assert!(parse("SHOW TABLES").is_ok());
    }

    #[test]
    fn rejects_an_unknown_statement_form() {
        let err = parse("FROB students").unwrap_err();
        assert!(matches!(err, ParseError::ParseError(_)));
    }

    #[test]
    fn lexer_errors_surface_as_tokenize_errors() {
        let err = parse("SELECT $ FROM s").unwrap_err();
        assert!(matches!(err, ParseError::TokenizeError(_)));
    }
}
