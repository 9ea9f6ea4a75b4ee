use std::path::{Path, PathBuf};

use tinysql_catalog::{catalog_path, Catalog, FileCatalog};
use tinysql_executor::Outcome;
use tinysql_storage::{Index, RecordStream, StorageEngine};

use crate::error::DbmsError;
use crate::EngineConfig;

/// The top-level handle a caller opens once per process (`spec.md` §5's
/// "process-scoped service" catalog and §9's "engine is single-process,
/// single-threaded"): owns the catalog and the storage engine, and runs
/// whole statements through the full pipeline in [`Database::run`].
pub struct Database {
    catalog: FileCatalog,
    storage: StorageEngine,
    data_dir: PathBuf,
    vacuum_on_drop: bool,
}

impl Database {
    /// Opens (or creates) the database rooted at `data_dir`, loading its
    /// catalog document if one already exists (`spec.md` §6:
    /// `<data_dir>/catalog.json`, `<data_dir>/data/`, `<data_dir>/indexes/`).
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, DbmsError> {
        Self::open_with_config(EngineConfig::new(data_dir))
    }

    /// Opens a database per an explicit [`EngineConfig`] (`SPEC_FULL.md`
    /// §2.2), e.g. one loaded from a TOML file via [`EngineConfig::from_file`].
    pub fn open_with_config(config: EngineConfig) -> Result<Self, DbmsError> {
        let catalog = FileCatalog::load(catalog_path(&config.data_dir))?;
        let storage = StorageEngine::new(&config.data_dir);
        tracing::info!(data_dir = %config.data_dir.display(), "opened database");
        Ok(Self {
            catalog,
            storage,
            data_dir: config.data_dir,
            vacuum_on_drop: config.vacuum_on_drop,
        })
    }

    /// An in-memory database with no backing directory, for tests and
    /// quick experiments; nothing it does ever touches the filesystem
    /// except for the per-table/per-index files `StorageEngine` always
    /// writes (there is no in-memory storage backend — `spec.md` §9
    /// treats the file-backed form as the only one).
    pub fn in_memory(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            catalog: FileCatalog::in_memory(),
            storage: StorageEngine::new(&data_dir),
            data_dir,
            vacuum_on_drop: false,
        }
    }

    /// The data directory this database is rooted at.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Runs one SQL statement through the full pipeline (`spec.md` §4):
    /// lex + parse, validate against the catalog, optimize (`SELECT`
    /// only), then execute, returning either a tabular result or a
    /// confirmation message.
    pub fn run(&mut self, sql: &str) -> Result<Outcome, DbmsError> {
        let span = tracing::info_span!("run", sql);
        let _enter = span.enter();

        let stmt = tinysql_parser::parse(sql)?;
        let bound = tinysql_validator::validate(&stmt, &self.catalog)?;
        let outcome = tinysql_executor::execute(&stmt, bound.aliases.as_ref(), &mut self.catalog, &self.storage)?;
        Ok(outcome)
    }

    /// Compacts every table: drops tombstoned slots, renumbers the
    /// remaining ones densely, and rebuilds every index on that table
    /// from the compacted file (`spec.md` §3's "after which any stale
    /// `__id__` is invalid" — nothing outside this call observes a slot
    /// id across a vacuum). Safe only between statements, never mid-batch.
    pub fn vacuum(&mut self) -> Result<(), DbmsError> {
        let tables: Vec<String> = self.catalog.tables().into_iter().map(|t| t.name.clone()).collect();
        for table in tables {
            let mut stream = self.storage.record_stream(&table);
            stream.vacuum()?;

            let meta = self.catalog.table(&table)?.clone();
            let slots = stream.read_all()?;
            for column in &meta.indexes {
                let entries: Vec<_> = slots
                    .iter()
                    .filter(|s| s.is_live)
                    .filter_map(|s| {
                        let value = s.get(column);
                        value.is_present().then_some((value, s.slot_id))
                    })
                    .collect();
                self.storage.index(&table, column).rebuild(entries)?;
            }
        }
        Ok(())
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if self.vacuum_on_drop {
            if let Err(err) = self.vacuum() {
                tracing::warn!(%err, "vacuum-on-drop failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(dir.path()).unwrap();
        db.run("CREATE TABLE students (id INTEGER PRIMARY KEY, name STRING, age INTEGER)").unwrap();
        (dir, db)
    }

    #[test]
    fn full_pipeline_runs_ddl_dml_and_select() {
        let (_dir, mut db) = fresh();
        db.run("INSERT INTO students (name, age) VALUES ('Ann', 21)").unwrap();
        db.run("INSERT INTO students (name, age) VALUES ('Bo', 19)").unwrap();

        let outcome = db.run("SELECT name FROM students WHERE age > 20").unwrap();
        match outcome {
            Outcome::Rows(rs) => assert_eq!(rs.rows, vec![vec!["Ann".to_string()]]),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn reopening_the_same_directory_preserves_state() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut db = Database::open(dir.path()).unwrap();
            db.run("CREATE TABLE t (id INTEGER PRIMARY KEY, v STRING)").unwrap();
            db.run("INSERT INTO t VALUES (1, 'hello')").unwrap();
        }
        let mut db = Database::open(dir.path()).unwrap();
        let outcome = db.run("SELECT v FROM t WHERE id = 1").unwrap();
        match outcome {
            Outcome::Rows(rs) => assert_eq!(rs.rows, vec![vec!["hello".to_string()]]),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn parse_error_is_wrapped_as_dbms_error() {
        let (_dir, mut db) = fresh();
        let err = db.run("SELEKT * FROM students").unwrap_err();
        assert!(matches!(err, DbmsError::Parse(_)));
    }

    #[test]
    fn validation_error_is_wrapped_as_dbms_error() {
        let (_dir, mut db) = fresh();
        let err = db.run("SELECT missing FROM students").unwrap_err();
        assert!(matches!(err, DbmsError::Validation(_)));
    }

    #[test]
    fn vacuum_preserves_rows_while_dropping_tombstones() {
        let (_dir, mut db) = fresh();
        db.run("INSERT INTO students (name, age) VALUES ('Ann', 21)").unwrap();
        db.run("INSERT INTO students (name, age) VALUES ('Bo', 19)").unwrap();
        db.run("DELETE FROM students WHERE name = 'Bo'").unwrap();

        db.vacuum().unwrap();

        let outcome = db.run("SELECT name FROM students").unwrap();
        match outcome {
            Outcome::Rows(rs) => assert_eq!(rs.rows, vec![vec!["Ann".to_string()]]),
            other => panic!("expected rows, got {:?}", other),
        }
    }
}
