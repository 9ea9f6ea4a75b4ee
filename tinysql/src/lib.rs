//! # tinysql
//!
//! A teaching-grade relational database engine (`spec.md` §1): two
//! scalar types (`INTEGER`, `STRING`), single-statement DDL/DML, joins,
//! aggregates, and a cost-free rule-based optimizer, all running
//! single-process and single-threaded against JSON-file-backed storage.
//!
//! This crate is the facade: [`Database`] wires together the pipeline
//! the other `tinysql-*` crates implement in stages — `tinysql-lexer`
//! and [`tinysql_parser`] turn SQL text into an AST,
//! [`tinysql_validator`] checks it against the [`tinysql_catalog`], an
//! optional `tinysql-optimizer` pass plans `SELECT`, and
//! [`tinysql_executor`] carries it out against [`tinysql_storage`].
//! Each stage's error type is re-exported and unified behind
//! [`DbmsError`] so a caller can match broadly or narrowly as it likes.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod config;
mod database;
mod error;

pub use self::{config::EngineConfig, database::Database, error::DbmsError};

pub use tinysql_ast as ast;
pub use tinysql_executor::{Outcome, ResultSet};
