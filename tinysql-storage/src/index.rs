use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tinysql_ast::Value;

use crate::error::IndexError;

/// Per-(table, column) mapping from key value to the set of record ids
/// carrying that value (`spec.md` §6's "Index file" contract). Must
/// support point lookup, range lookup, full key enumeration, and
/// unique-key count for cardinality estimation.
pub trait Index {
    /// Every live id stored under `key`.
    fn lookup(&self, key: &Value) -> Result<HashSet<u64>, IndexError>;

    /// All `(key, ids)` entries whose key falls in `[lo, hi]` (either bound
    /// `None` means unbounded on that side), in ascending key order.
    fn range(
        &self,
        lo: Option<&Value>,
        hi: Option<&Value>,
    ) -> Result<Vec<(Value, HashSet<u64>)>, IndexError>;

    /// Every entry, in ascending key order (a full scan of the index).
    fn all_entries(&self) -> Result<Vec<(Value, HashSet<u64>)>, IndexError>;

    /// The number of distinct key values currently indexed, used by the
    /// optimizer's `1 / unique_keys` selectivity estimate (`spec.md` §4.4).
    fn unique_key_count(&self) -> Result<u64, IndexError>;

    /// Records that `id` now carries `key`.
    fn insert(&mut self, key: Value, id: u64) -> Result<(), IndexError>;

    /// Removes the `(key, id)` association, e.g. on delete or on update
    /// away from `key`.
    fn remove(&mut self, key: &Value, id: u64) -> Result<(), IndexError>;

    /// Replaces the index contents wholesale, used by `CREATE INDEX`'s
    /// full-scan rebuild and by vacuum's id renumbering (`spec.md` §4.5).
    fn rebuild(&mut self, entries: Vec<(Value, u64)>) -> Result<(), IndexError>;
}

/// An [`Index`] persisted as a flat `Vec<(Value, Vec<id>)>` JSON file
/// (`spec.md` §6: `<data_dir>/indexes/<table>__<column>.idx`). A
/// `HashMap<Value, _>` is not serialized as a JSON object key directly by
/// `serde_json` for a non-string key type, so the on-disk shape is a
/// vector of pairs; the in-memory working copy loaded per-operation is a
/// plain `Vec` as well, kept small by this engine's teaching-grade scale.
pub struct FileIndex {
    path: PathBuf,
}

impl FileIndex {
    /// Opens (without yet reading) the index file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Vec<(Value, Vec<u64>)>, IndexError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| IndexError::Corrupt(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(IndexError::Io(e.to_string())),
        }
    }

    fn save(&self, entries: &[(Value, Vec<u64>)]) -> Result<(), IndexError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| IndexError::Io(e.to_string()))?;
        }
        let json =
            serde_json::to_string(entries).map_err(|e| IndexError::Corrupt(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| IndexError::Io(e.to_string()))
    }
}

impl Index for FileIndex {
    fn lookup(&self, key: &Value) -> Result<HashSet<u64>, IndexError> {
        let entries = self.load()?;
        Ok(entries
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, ids)| ids.into_iter().collect())
            .unwrap_or_default())
    }

    fn range(
        &self,
        lo: Option<&Value>,
        hi: Option<&Value>,
    ) -> Result<Vec<(Value, HashSet<u64>)>, IndexError> {
        let mut entries = self.load()?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries
            .into_iter()
            .filter(|(k, _)| lo.map_or(true, |lo| k >= lo) && hi.map_or(true, |hi| k <= hi))
            .map(|(k, ids)| (k, ids.into_iter().collect()))
            .collect())
    }

    fn all_entries(&self) -> Result<Vec<(Value, HashSet<u64>)>, IndexError> {
        let mut entries = self.load()?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries
            .into_iter()
            .map(|(k, ids)| (k, ids.into_iter().collect()))
            .collect())
    }

    fn unique_key_count(&self) -> Result<u64, IndexError> {
        Ok(self.load()?.len() as u64)
    }

    fn insert(&mut self, key: Value, id: u64) -> Result<(), IndexError> {
        let mut entries = self.load()?;
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, ids)) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            None => entries.push((key, vec![id])),
        }
        self.save(&entries)
    }

    fn remove(&mut self, key: &Value, id: u64) -> Result<(), IndexError> {
        let mut entries = self.load()?;
        if let Some(pos) = entries.iter().position(|(k, _)| k == key) {
            entries[pos].1.retain(|&existing| existing != id);
            if entries[pos].1.is_empty() {
                entries.remove(pos);
            }
        }
        self.save(&entries)
    }

    fn rebuild(&mut self, entries: Vec<(Value, u64)>) -> Result<(), IndexError> {
        let mut grouped: Vec<(Value, Vec<u64>)> = Vec::new();
        for (key, id) in entries {
            match grouped.iter_mut().find(|(k, _)| *k == key) {
                Some((_, ids)) => ids.push(id),
                None => grouped.push((key, vec![id])),
            }
        }
        self.save(&grouped)
    }
}

/// The path a (table, column) index lives at, given a data directory
/// (`spec.md` §6: `<data_dir>/indexes/<table>__<column>.idx`).
pub fn index_path(data_dir: impl AsRef<Path>, table: &str, column: &str) -> PathBuf {
    data_dir
        .as_ref()
        .join("indexes")
        .join(format!("{}__{}.idx", table, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FileIndex::new(dir.path().join("s__id.idx"));
        index.insert(Value::Int(1), 0).unwrap();
        index.insert(Value::Int(1), 1).unwrap();
        let ids = index.lookup(&Value::Int(1)).unwrap();
        assert_eq!(ids, HashSet::from([0, 1]));
    }

    #[test]
    fn remove_drops_the_entry_once_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FileIndex::new(dir.path().join("s__id.idx"));
        index.insert(Value::Int(1), 0).unwrap();
        index.remove(&Value::Int(1), 0).unwrap();
        assert_eq!(index.unique_key_count().unwrap(), 0);
    }

    #[test]
    fn range_is_ascending_and_respects_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FileIndex::new(dir.path().join("s__age.idx"));
        for (age, id) in [(19, 0), (20, 1), (22, 2)] {
            index.insert(Value::Int(age), id).unwrap();
        }
        let entries = index.range(Some(&Value::Int(20)), None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, Value::Int(20));
        assert_eq!(entries[1].0, Value::Int(22));
    }

    #[test]
    fn rebuild_replaces_contents_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FileIndex::new(dir.path().join("s__id.idx"));
        index.insert(Value::Int(99), 0).unwrap();
        index.rebuild(vec![(Value::Int(1), 0), (Value::Int(2), 1)]).unwrap();
        assert!(index.lookup(&Value::Int(99)).unwrap().is_empty());
        assert_eq!(index.lookup(&Value::Int(1)).unwrap(), HashSet::from([0]));
    }
}
