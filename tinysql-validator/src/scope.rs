use std::collections::HashMap;

use tinysql_ast::{Projection, QualifiedName, SelectStmt, TableRef};
use tinysql_catalog::Catalog;

use crate::error::ValidationError;

/// What a `FROM`/`JOIN` alias resolves to, for column-reference resolution
/// (`spec.md` §4.3 item 1-2).
enum Scope {
    /// A base table: the alias may only project/reference these columns.
    Table(Vec<String>),
    /// A derived table projecting specific columns.
    DerivedColumns(Vec<String>),
    /// A derived table projecting `SELECT *`: its column set is unknown
    /// statically, so any reference under this alias is accepted.
    DerivedAll,
}

impl Scope {
    fn has_column(&self, name: &str) -> bool {
        match self {
            Scope::Table(cols) | Scope::DerivedColumns(cols) => cols.iter().any(|c| c == name),
            Scope::DerivedAll => true,
        }
    }
}

/// The alias -> real-table-name map for one statement (`spec.md` §4.3 item
/// 1), plus enough column scope to resolve every reference in it. Built
/// once by the validator and handed to the optimizer/executor so neither
/// has to re-derive it.
pub struct AliasMap {
    /// alias (or bare table name) -> underlying real table name, `None`
    /// for a derived table (it has no catalog entry).
    real_names: HashMap<String, Option<String>>,
    scopes: HashMap<String, Scope>,
}

impl AliasMap {
    fn empty() -> Self {
        Self {
            real_names: HashMap::new(),
            scopes: HashMap::new(),
        }
    }

    /// The real table name behind `alias`, or `None` if `alias` names a
    /// derived table (no backing catalog entry) or is not in scope.
    pub fn real_table(&self, alias: &str) -> Option<&str> {
        self.real_names.get(alias).and_then(|o| o.as_deref())
    }

    /// Every alias currently in scope.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.real_names.keys().map(|s| s.as_str())
    }

    fn insert_table_ref(
        &mut self,
        table_ref: &TableRef,
        catalog: &dyn Catalog,
    ) -> Result<(), ValidationError> {
        let alias = table_ref.alias().to_string();
        if self.real_names.contains_key(&alias) {
            return Err(ValidationError::DuplicateAlias(alias));
        }
        match table_ref {
            TableRef::Named(name, _) => {
                let meta = catalog
                    .table(name)
                    .map_err(|_| ValidationError::TableNotFound(name.clone()))?;
                let columns: Vec<String> = meta.columns.iter().map(|c| c.name.clone()).collect();
                self.real_names.insert(alias.clone(), Some(name.clone()));
                self.scopes.insert(alias, Scope::Table(columns));
            }
            TableRef::Derived(select, _) => {
                if table_ref.alias().is_empty() {
                    return Err(ValidationError::DerivedTableRequiresAlias);
                }
                // Nested scope is validated independently; its alias scope
                // does not leak into the outer statement (no correlated
                // subqueries, per `spec.md` §1's Non-goals).
                validate_select_scopes(select, catalog)?;
                let scope = match &select.projection {
                    Projection::All => Scope::DerivedAll,
                    Projection::Columns(items) => {
                        Scope::DerivedColumns(items.iter().map(|i| i.output_name()).collect())
                    }
                };
                self.real_names.insert(alias.clone(), None);
                self.scopes.insert(alias, scope);
            }
        }
        Ok(())
    }

    /// Resolves a qualified or unqualified column reference against this
    /// scope (`spec.md` §4.3 item 2).
    pub fn resolve(&self, name: &QualifiedName) -> Result<(), ValidationError> {
        match &name.qualifier {
            Some(alias) => {
                let scope = self
                    .scopes
                    .get(alias)
                    .ok_or_else(|| ValidationError::UnknownTableAlias(alias.clone()))?;
                if scope.has_column(&name.name) {
                    Ok(())
                } else {
                    Err(ValidationError::UnknownColumn {
                        qualifier: Some(alias.clone()),
                        column: name.name.clone(),
                    })
                }
            }
            None => {
                let matches = self
                    .scopes
                    .values()
                    .filter(|scope| scope.has_column(&name.name))
                    .count();
                match matches {
                    0 => Err(ValidationError::UnknownColumn {
                        qualifier: None,
                        column: name.name.clone(),
                    }),
                    1 => Ok(()),
                    _ => Err(ValidationError::AmbiguousColumn(name.name.clone())),
                }
            }
        }
    }
}

/// Builds the alias map for a `SELECT`'s `FROM` + `JOIN` clauses,
/// resolving every table/derived-table reference against the catalog.
pub fn build_alias_map(select: &SelectStmt, catalog: &dyn Catalog) -> Result<AliasMap, ValidationError> {
    let mut map = AliasMap::empty();
    map.insert_table_ref(&select.from, catalog)?;
    for join in &select.joins {
        map.insert_table_ref(&join.table, catalog)?;
    }
    Ok(map)
}

/// Runs the full structural check on a nested `SELECT` (used for both
/// `IN (subquery)` and derived tables) without returning its alias map —
/// callers only need to know it's well-formed.
pub fn validate_select_scopes(select: &SelectStmt, catalog: &dyn Catalog) -> Result<(), ValidationError> {
    crate::select::validate_select(select, catalog).map(|_| ())
}
