use std::fmt;

/// One of the two scalar types this dialect supports (`spec.md` §3).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    /// Signed 64-bit integer.
    Int,
    /// UTF-8, unbounded-length string.
    Str,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataType::Int => "INTEGER",
            DataType::Str => "STRING",
        })
    }
}

/// A scalar runtime value, tagged so every compare/aggregate path can
/// dispatch on it (`spec.md` §9's "dynamic per-field typing → tagged value").
///
/// `Absent` models a field that is missing from a record — the closest this
/// dialect gets to `NULL` (there is no `NULL` literal in the surface
/// grammar; a value is only ever absent because a column wasn't set).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// A present integer value.
    Int(i64),
    /// A present string value.
    Str(String),
    /// No value at all.
    Absent,
}

impl Value {
    /// True unless the value is [`Value::Absent`].
    pub fn is_present(&self) -> bool {
        !matches!(self, Value::Absent)
    }

    /// The data type of a present value, or `None` for `Absent`.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Int(_) => Some(DataType::Int),
            Value::Str(_) => Some(DataType::Str),
            Value::Absent => None,
        }
    }

    /// Renders the value the way `spec.md` §4.5 requires result rows to:
    /// absent values become the literal string `"NULL"`.
    pub fn display_or_null(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Str(s) => s.clone(),
            Value::Absent => "NULL".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Absent => f.write_str("NULL"),
        }
    }
}

/// A column reference, optionally qualified by a table alias: `q.c` or `c`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualifiedName {
    /// The alias or table name prefix, if the reference was written `q.c`.
    pub qualifier: Option<String>,
    /// The column name.
    pub name: String,
}

impl QualifiedName {
    /// An unqualified column reference, e.g. from `WHERE age > 20`.
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    /// A qualified column reference, e.g. from `WHERE s.age > 20`.
    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => f.write_str(&self.name),
        }
    }
}
