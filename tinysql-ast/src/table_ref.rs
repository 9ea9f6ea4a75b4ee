use std::fmt;

use crate::statement::SelectStmt;

/// A `FROM`/`JOIN` source (`spec.md` §3's `TableRef` node family).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableRef {
    /// A base table, optionally aliased: `name [[AS] alias]`.
    Named(String, Option<String>),
    /// A derived table: `(select) [AS] alias`.
    Derived(Box<SelectStmt>, String),
}

impl TableRef {
    /// The name this reference is known by in the statement's alias scope:
    /// the alias if one was given, otherwise the base table name.
    pub fn alias(&self) -> &str {
        match self {
            TableRef::Named(name, alias) => alias.as_deref().unwrap_or(name),
            TableRef::Derived(_, alias) => alias,
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRef::Named(name, Some(alias)) => write!(f, "{} AS {}", name, alias),
            TableRef::Named(name, None) => f.write_str(name),
            TableRef::Derived(_, alias) => write!(f, "(...) AS {}", alias),
        }
    }
}
