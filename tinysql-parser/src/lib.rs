//! # tinysql-parser
//!
//! Turns a tinysql token stream into the AST defined by `tinysql-ast`
//! (`spec.md` §4.2): an LALR-style recursive-descent parser over a fixed,
//! non-extensible grammar.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod error;
mod parser;
mod peek;

pub use self::{error::ParseError, parser::parse};
