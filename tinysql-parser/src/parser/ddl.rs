use tinysql_ast::{
    ColumnDef, CreateIndexStmt, CreateTableStmt, DataType, DropIndexStmt, DropTableStmt,
    ForeignKeyDef, Statement,
};
use tinysql_lexer::{Keyword, Token};

use crate::error::{parse_error, ParseError};

use super::Parser;

/// One comma-separated entry inside a `CREATE TABLE` column-def list: either
/// a column declaration or a standalone `FOREIGN KEY` constraint
/// (`spec.md` §4.2).
enum ColumnDefListItem {
    Column(ColumnDef),
    ForeignKey(ForeignKeyDef),
}

impl Parser {
    /// `CREATE (TABLE name '(' col_def_list ')' | INDEX ON name '(' col ')')`.
    pub(super) fn parse_create(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::CREATE)?;
        if self.parse_keyword(Keyword::TABLE) {
            self.parse_create_table_body().map(Statement::CreateTable)
        } else if self.parse_keyword(Keyword::INDEX) {
            self.parse_create_index_body().map(Statement::CreateIndex)
        } else {
            parse_error("expected TABLE or INDEX after CREATE")
        }
    }

    /// `DROP (TABLE name | INDEX ON name '(' col ')')`.
    pub(super) fn parse_drop(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::DROP)?;
        if self.parse_keyword(Keyword::TABLE) {
            let name = self.expect_ident()?;
            Ok(Statement::DropTable(DropTableStmt { name }))
        } else if self.parse_keyword(Keyword::INDEX) {
            self.expect_keyword(Keyword::ON)?;
            let table = self.expect_ident()?;
            self.expect_token(&Token::LeftParen)?;
            let column = self.expect_ident()?;
            self.expect_token(&Token::RightParen)?;
            Ok(Statement::DropIndex(DropIndexStmt { table, column }))
        } else {
            parse_error("expected TABLE or INDEX after DROP")
        }
    }

    fn parse_create_table_body(&mut self) -> Result<CreateTableStmt, ParseError> {
        let name = self.expect_ident()?;
        self.expect_token(&Token::LeftParen)?;
        let items = self.parse_comma_separated(Self::parse_column_def_list_item)?;
        self.expect_token(&Token::RightParen)?;

        let mut columns = Vec::new();
        let mut foreign_keys = Vec::new();
        for item in items {
            match item {
                ColumnDefListItem::Column(column) => columns.push(column),
                ColumnDefListItem::ForeignKey(fk) => foreign_keys.push(fk),
            }
        }
        Ok(CreateTableStmt {
            name,
            columns,
            foreign_keys,
        })
    }

    fn parse_column_def_list_item(&mut self) -> Result<ColumnDefListItem, ParseError> {
        if self.parse_keyword(Keyword::FOREIGN) {
            self.expect_keyword(Keyword::KEY)?;
            self.expect_token(&Token::LeftParen)?;
            let column = self.expect_ident()?;
            self.expect_token(&Token::RightParen)?;
            self.expect_keyword(Keyword::REFERENCES)?;
            let ref_table = self.expect_ident()?;
            self.expect_token(&Token::LeftParen)?;
            let ref_column = self.expect_ident()?;
            self.expect_token(&Token::RightParen)?;
            return Ok(ColumnDefListItem::ForeignKey(ForeignKeyDef {
                column,
                ref_table,
                ref_column,
            }));
        }

        let name = self.expect_ident()?;
        let data_type = self.parse_data_type()?;
        let mut is_primary_key = false;
        let mut is_auto_increment = false;
        let mut is_not_null = false;
        loop {
            if self.parse_keywords(&[Keyword::PRIMARY, Keyword::KEY]) {
                is_primary_key = true;
            } else if self.parse_keyword(Keyword::AUTO_INCREMENT) {
                is_auto_increment = true;
            } else if self.parse_keywords(&[Keyword::NOT, Keyword::NULL]) {
                is_not_null = true;
            } else {
                break;
            }
        }
        Ok(ColumnDefListItem::Column(ColumnDef {
            name,
            data_type,
            is_primary_key,
            is_auto_increment,
            is_not_null,
        }))
    }

    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        if self.parse_keyword(Keyword::INTEGER) {
            Ok(DataType::Int)
        } else {
            self.expect_keyword(Keyword::STRING)?;
            Ok(DataType::Str)
        }
    }

    fn parse_create_index_body(&mut self) -> Result<CreateIndexStmt, ParseError> {
        self.expect_keyword(Keyword::ON)?;
        let table = self.expect_ident()?;
        self.expect_token(&Token::LeftParen)?;
        let column = self.expect_ident()?;
        self.expect_token(&Token::RightParen)?;
        Ok(CreateIndexStmt { table, column })
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use tinysql_ast::{DataType, Statement};

    #[test]
    fn column_constraints_in_any_order() {
        let stmt = match parse(
            "CREATE TABLE s (id INTEGER AUTO_INCREMENT PRIMARY KEY, name STRING NOT NULL)",
        )
        .unwrap()
        {
            Statement::CreateTable(stmt) => stmt,
            other => panic!("expected a CREATE TABLE, got {:?}", other),
        };
        assert_eq!(stmt.columns[0].data_type, DataType::Int);
        assert!(stmt.columns[0].is_auto_increment);
        assert!(stmt.columns[0].is_primary_key);
        assert!(stmt.columns[1].is_not_null);
    }

    #[test]
    fn reserved_words_demote_to_identifiers_in_column_def_list() {
        let stmt = match parse("CREATE TABLE t (count INTEGER, key STRING)").unwrap() {
            Statement::CreateTable(stmt) => stmt,
            other => panic!("expected a CREATE TABLE, got {:?}", other),
        };
        assert_eq!(stmt.columns[0].name, "count");
        assert_eq!(stmt.columns[1].name, "key");
    }

    #[test]
    fn standalone_foreign_key_constraint() {
        let stmt = match parse(
            "CREATE TABLE e (sid INTEGER, FOREIGN KEY (sid) REFERENCES s(id))",
        )
        .unwrap()
        {
            Statement::CreateTable(stmt) => stmt,
            other => panic!("expected a CREATE TABLE, got {:?}", other),
        };
        assert_eq!(stmt.foreign_keys.len(), 1);
        assert_eq!(stmt.foreign_keys[0].column, "sid");
        assert_eq!(stmt.foreign_keys[0].ref_table, "s");
        assert_eq!(stmt.foreign_keys[0].ref_column, "id");
    }

    #[test]
    fn create_and_drop_index() {
        match parse("CREATE INDEX ON s (age)").unwrap() {
            Statement::CreateIndex(stmt) => {
                assert_eq!(stmt.table, "s");
                assert_eq!(stmt.column, "age");
            }
            other => panic!("expected a CREATE INDEX, got {:?}", other),
        }
        match parse("DROP INDEX ON s (age)").unwrap() {
            Statement::DropIndex(stmt) => {
                assert_eq!(stmt.table, "s");
                assert_eq!(stmt.column, "age");
            }
            other => panic!("expected a DROP INDEX, got {:?}", other),
        }
    }

    #[test]
    fn drop_table() {
        match parse("DROP TABLE s").unwrap() {
            Statement::DropTable(stmt) => assert_eq!(stmt.name, "s"),
            other => panic!("expected a DROP TABLE, got {:?}", other),
        }
    }
}
