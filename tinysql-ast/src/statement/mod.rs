mod ddl;
mod dml;
mod select;

use std::fmt;

pub use self::{ddl::*, dml::*, select::*};

/// `SHOW TABLES`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShowTablesStmt;

impl fmt::Display for ShowTablesStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SHOW TABLES")
    }
}

/// `DESCRIBE name`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescribeStmt {
    /// The table to describe.
    pub table: String,
}

impl fmt::Display for DescribeStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DESCRIBE {}", self.table)
    }
}

/// A top-level statement (`spec.md` §3's `Statement` node family).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// `CREATE TABLE ...`
    CreateTable(CreateTableStmt),
    /// `DROP TABLE ...`
    DropTable(DropTableStmt),
    /// `CREATE INDEX ...`
    CreateIndex(CreateIndexStmt),
    /// `DROP INDEX ...`
    DropIndex(DropIndexStmt),
    /// `SELECT ...`
    Select(SelectStmt),
    /// `INSERT INTO ...`
    Insert(InsertStmt),
    /// `UPDATE ...`
    Update(UpdateStmt),
    /// `DELETE FROM ...`
    Delete(DeleteStmt),
    /// `SHOW TABLES`
    ShowTables(ShowTablesStmt),
    /// `DESCRIBE ...`
    Describe(DescribeStmt),
}

impl Statement {
    /// A short, human-readable name for this statement's kind, used in
    /// logging spans and diagnostics (never in result output).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::CreateTable(_) => "CREATE TABLE",
            Statement::DropTable(_) => "DROP TABLE",
            Statement::CreateIndex(_) => "CREATE INDEX",
            Statement::DropIndex(_) => "DROP INDEX",
            Statement::Select(_) => "SELECT",
            Statement::Insert(_) => "INSERT",
            Statement::Update(_) => "UPDATE",
            Statement::Delete(_) => "DELETE",
            Statement::ShowTables(_) => "SHOW TABLES",
            Statement::Describe(_) => "DESCRIBE",
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::CreateTable(s) => write!(f, "{}", s),
            Statement::DropTable(s) => write!(f, "{}", s),
            Statement::CreateIndex(s) => write!(f, "{}", s),
            Statement::DropIndex(s) => write!(f, "{}", s),
            Statement::Select(s) => write!(f, "{}", s),
            Statement::Insert(s) => write!(f, "{}", s),
            Statement::Update(s) => write!(f, "{}", s),
            Statement::Delete(s) => write!(f, "{}", s),
            Statement::ShowTables(s) => write!(f, "{}", s),
            Statement::Describe(s) => write!(f, "{}", s),
        }
    }
}
