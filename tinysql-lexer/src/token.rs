use std::fmt;

use crate::keyword::Keyword;

/// A single lexical token produced by [`Lexer`](crate::Lexer).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    /// Whitespace (space, tab, newline, carriage return).
    Whitespace(char),
    /// An integer literal. Always non-negative at the token level (`spec.md` §4.1).
    Number(i64),
    /// A single- or double-quoted string literal; the inner bytes, quote type erased.
    String(String),
    /// An identifier or a word demoted from keyword by the column-def-list rule.
    Ident(String),
    /// A reserved word, carrying both the matched keyword and its original spelling.
    Keyword(Keyword, String),

    /// `,`
    Comma,
    /// `;`
    SemiColon,
    /// `.`
    Period,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `*`
    Asterisk,

    /// `=`
    Equal,
    /// `!=` or `<>`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
}

impl Token {
    /// Builds an `Ident` or `Keyword` token for the given word, honoring the
    /// caller's decision on whether keyword recognition is demoted right now.
    ///
    /// `FOREIGN` is never demoted even inside a demotable position: it is the
    /// only reserved word that also introduces a grammar production (a
    /// standalone `FOREIGN KEY (...)` constraint) at the exact position
    /// (right after `(` or `,` in a column-def list) where demotion would
    /// otherwise apply, so demoting it would make that constraint
    /// unparseable.
    pub fn make_word(word: String, demote_keywords: bool) -> Token {
        match Keyword::lookup(&word) {
            Some(Keyword::FOREIGN) => Token::Keyword(Keyword::FOREIGN, word),
            Some(_) if demote_keywords => Token::Ident(word),
            Some(keyword) => Token::Keyword(keyword, word),
            None => Token::Ident(word),
        }
    }

    /// True for any whitespace token.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace(_))
    }

    /// True if this token is the given keyword.
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(kw, _) if *kw == keyword)
    }

    /// Returns the keyword this token matches, if it is one of `keywords`.
    pub fn is_one_of_keywords(&self, keywords: &[Keyword]) -> Option<Keyword> {
        match self {
            Token::Keyword(kw, _) if keywords.contains(kw) => Some(*kw),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Whitespace(ch) => write!(f, "{}", ch),
            Token::Number(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "'{}'", s),
            Token::Ident(s) => write!(f, "{}", s),
            Token::Keyword(_, raw) => write!(f, "{}", raw),
            Token::Comma => write!(f, ","),
            Token::SemiColon => write!(f, ";"),
            Token::Period => write!(f, "."),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Asterisk => write!(f, "*"),
            Token::Equal => write!(f, "="),
            Token::NotEqual => write!(f, "<>"),
            Token::LessThan => write!(f, "<"),
            Token::LessThanOrEqual => write!(f, "<="),
            Token::GreaterThan => write!(f, ">"),
            Token::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}
