use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::error::{IndexError, StorageError};
use crate::index::{index_path, FileIndex};
use crate::record_stream::{record_stream_path, FileRecordStream};

/// A factory for the per-table record streams and per-(table, column)
/// indexes living under one data directory (`spec.md` §6). Each call
/// opens a fresh handle onto its file; nothing here is held open across
/// statements, satisfying the resource-scoping requirement in `spec.md`
/// §5 without a manual `Drop` impl.
///
/// Mirrors the "lazy `IndexManager` attached to the catalog" design note
/// (`spec.md` §9) by living outside the catalog: the executor owns a
/// `StorageEngine` and hands it concrete table/column names as needed,
/// rather than the catalog reaching back into storage.
#[derive(Clone)]
pub struct StorageEngine {
    data_dir: PathBuf,
}

impl StorageEngine {
    /// Roots a storage engine at `data_dir`, creating nothing yet.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory this engine is rooted at.
    pub fn data_dir(&self) -> &std::path::Path {
        &self.data_dir
    }

    /// A handle onto `table`'s record stream.
    pub fn record_stream(&self, table: &str) -> FileRecordStream {
        FileRecordStream::new(record_stream_path(&self.data_dir, table))
    }

    /// A handle onto the index over `table.column`.
    pub fn index(&self, table: &str, column: &str) -> FileIndex {
        FileIndex::new(index_path(&self.data_dir, table, column))
    }

    /// Deletes a table's record file and every index file named in
    /// `indexed_columns`, called when `DROP TABLE` succeeds.
    pub fn drop_table_files(
        &self,
        table: &str,
        indexed_columns: &HashSet<String>,
    ) -> Result<(), StorageError> {
        let data_path = record_stream_path(&self.data_dir, table);
        if data_path.exists() {
            fs::remove_file(&data_path).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        for column in indexed_columns {
            let idx_path = index_path(&self.data_dir, table, column);
            if idx_path.exists() {
                fs::remove_file(&idx_path).map_err(|e| StorageError::Io(e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Deletes a single index file, called when `DROP INDEX` succeeds.
    pub fn drop_index_file(&self, table: &str, column: &str) -> Result<(), IndexError> {
        let path = index_path(&self.data_dir, table, column);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| IndexError::Io(e.to_string()))?;
        }
        Ok(())
    }
}
