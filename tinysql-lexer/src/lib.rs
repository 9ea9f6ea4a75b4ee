//! # tinysql-lexer
//!
//! Converts tinysql source text into a stream of [`Token`]s (`spec.md` §4.1).

#![deny(missing_docs)]
#![deny(unused_imports)]

mod error;
mod keyword;
mod lexer;
mod token;

pub use self::{
    error::{LexError, Location},
    keyword::{Keyword, ALL_KEYWORDS, ALL_KEYWORD_STRINGS},
    lexer::Lexer,
    token::Token,
};
