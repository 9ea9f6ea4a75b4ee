//! # tinysql-ast
//!
//! AST node types for the tinysql dialect (`spec.md` §3): statements,
//! expressions, conditions, table references, and the two-type scalar
//! value model shared by the parser, validator, optimizer, and executor.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod condition;
mod expr;
mod statement;
mod table_ref;
mod types;
mod utils;

pub use self::{condition::*, expr::*, statement::*, table_ref::*, types::*};
