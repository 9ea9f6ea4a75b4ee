use tinysql_ast::Statement;

use crate::scope::AliasMap;

/// A statement that has passed validation (`spec.md` §4.3), paired with
/// the alias map built while validating it. Only `SELECT` produces one;
/// every other statement kind carries `aliases: None`.
pub struct Bound<'a> {
    /// The statement that was validated.
    pub statement: &'a Statement,
    /// The `FROM`/`JOIN` alias map, present only for `SELECT`.
    pub aliases: Option<AliasMap>,
}
