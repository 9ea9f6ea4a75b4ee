use std::fmt;

use tinysql_lexer::LexError;

/// An error raised while turning a token stream into an AST (`spec.md` §4.2).
#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    /// The lexer failed before parsing could start.
    TokenizeError(String),
    /// The token stream didn't match the grammar.
    ParseError(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseError::TokenizeError(s) => s,
            ParseError::ParseError(s) => s,
        })
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self::TokenizeError(err.to_string())
    }
}

impl From<String> for ParseError {
    fn from(err: String) -> Self {
        Self::ParseError(err)
    }
}

impl From<&str> for ParseError {
    fn from(err: &str) -> Self {
        Self::ParseError(err.into())
    }
}

/// Builds a parse error from a message.
pub(crate) fn parse_error<R>(message: impl Into<String>) -> Result<R, ParseError> {
    Err(ParseError::ParseError(message.into()))
}
