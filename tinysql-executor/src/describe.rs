use tinysql_ast::DescribeStmt;
use tinysql_catalog::Catalog;

use crate::error::ExecutionError;
use crate::result::ResultSet;

/// `SHOW TABLES` (`spec.md` §4.2, §4.5): every table name the catalog
/// currently knows, sorted for a stable, deterministic display order.
pub(crate) fn show_tables(catalog: &dyn Catalog) -> ResultSet {
    let mut names: Vec<String> = catalog.tables().into_iter().map(|t| t.name.clone()).collect();
    names.sort();
    ResultSet {
        columns: vec!["table".to_string()],
        rows: names.into_iter().map(|n| vec![n]).collect(),
    }
}

/// `DESCRIBE table` (`spec.md` §4.2, §4.5): one row per declared column,
/// naming its type and constraint flags.
pub(crate) fn describe(stmt: &DescribeStmt, catalog: &dyn Catalog) -> Result<ResultSet, ExecutionError> {
    let meta = catalog.table(&stmt.table)?;
    let columns = vec![
        "column".to_string(),
        "type".to_string(),
        "primary_key".to_string(),
        "not_null".to_string(),
        "auto_increment".to_string(),
    ];
    let rows = meta
        .columns
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.data_type.to_string(),
                yes_no(c.is_primary_key),
                yes_no(c.is_not_null),
                yes_no(c.is_auto_increment),
            ]
        })
        .collect();
    Ok(ResultSet { columns, rows })
}

fn yes_no(b: bool) -> String {
    if b { "YES" } else { "NO" }.to_string()
}
