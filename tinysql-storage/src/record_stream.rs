use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::record::{Record, Slot};

/// Per-table opaque sequence of records with tombstones (`spec.md` §6's
/// "Record stream" contract). Must support full read, bulk write, point
/// read by slot id, update-in-place, and soft-delete.
pub trait RecordStream {
    /// Every slot, live or tombstoned, in slot-id order.
    fn read_all(&self) -> Result<Vec<Slot>, StorageError>;

    /// A single slot by id, or `None` if it was never allocated.
    fn read(&self, slot_id: u64) -> Result<Option<Slot>, StorageError>;

    /// Appends a new live record, returning its freshly allocated slot id.
    fn append(&mut self, record: Record) -> Result<u64, StorageError>;

    /// Overwrites the record at `slot_id` in place, preserving its slot id
    /// and liveness.
    fn update(&mut self, slot_id: u64, record: Record) -> Result<(), StorageError>;

    /// Sets the tombstone on `slot_id`; the slot is kept, not removed.
    fn soft_delete(&mut self, slot_id: u64) -> Result<(), StorageError>;

    /// Compacts the stream: drops tombstoned slots and renumbers the
    /// remaining ones densely from 0. Returns the `(old_id, new_id)`
    /// mapping so callers (the executor) can rebuild indexes over the new
    /// ids (`spec.md` §3: "after which any stale `__id__` is invalid").
    fn vacuum(&mut self) -> Result<Vec<(u64, u64)>, StorageError>;
}

/// A [`RecordStream`] backed by one JSON file per table (`spec.md` §6:
/// `<data_dir>/data/<table>.tbl`). Every operation reads the whole file in
/// and writes it whole back out; simple, and sufficient for a
/// teaching-grade engine with no concurrent writers (`spec.md` §5).
pub struct FileRecordStream {
    path: PathBuf,
}

impl FileRecordStream {
    /// Opens (without yet reading) the record stream at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Vec<Slot>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::Corrupt(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    fn save(&self, slots: &[Slot]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        let json = serde_json::to_string(slots).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StorageError::Io(e.to_string()))
    }
}

impl RecordStream for FileRecordStream {
    fn read_all(&self) -> Result<Vec<Slot>, StorageError> {
        self.load()
    }

    fn read(&self, slot_id: u64) -> Result<Option<Slot>, StorageError> {
        Ok(self.load()?.into_iter().find(|s| s.slot_id == slot_id))
    }

    fn append(&mut self, record: Record) -> Result<u64, StorageError> {
        let mut slots = self.load()?;
        let slot_id = slots.len() as u64;
        slots.push(Slot {
            slot_id,
            is_live: true,
            record,
        });
        self.save(&slots)?;
        Ok(slot_id)
    }

    fn update(&mut self, slot_id: u64, record: Record) -> Result<(), StorageError> {
        let mut slots = self.load()?;
        let slot = slots
            .iter_mut()
            .find(|s| s.slot_id == slot_id)
            .ok_or(StorageError::SlotNotFound(slot_id))?;
        slot.record = record;
        self.save(&slots)
    }

    fn soft_delete(&mut self, slot_id: u64) -> Result<(), StorageError> {
        let mut slots = self.load()?;
        let slot = slots
            .iter_mut()
            .find(|s| s.slot_id == slot_id)
            .ok_or(StorageError::SlotNotFound(slot_id))?;
        slot.is_live = false;
        self.save(&slots)
    }

    fn vacuum(&mut self) -> Result<Vec<(u64, u64)>, StorageError> {
        let slots = self.load()?;
        let mut remap = Vec::new();
        let mut compacted = Vec::new();
        for slot in slots.into_iter().filter(|s| s.is_live) {
            let new_id = compacted.len() as u64;
            remap.push((slot.slot_id, new_id));
            compacted.push(Slot {
                slot_id: new_id,
                is_live: true,
                record: slot.record,
            });
        }
        self.save(&compacted)?;
        Ok(remap)
    }
}

/// The path a table's record stream lives at, given a data directory
/// (`spec.md` §6: `<data_dir>/data/<table>.tbl`).
pub fn record_stream_path(data_dir: impl AsRef<Path>, table: &str) -> PathBuf {
    data_dir.as_ref().join("data").join(format!("{}.tbl", table))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pairs: &[(&str, tinysql_ast::Value)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn append_then_read_all_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut stream = FileRecordStream::new(dir.path().join("s.tbl"));
        let id = stream
            .append(rec(&[("id", tinysql_ast::Value::Int(1))]))
            .unwrap();
        assert_eq!(id, 0);
        let all = stream.read_all().unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_live);
    }

    #[test]
    fn soft_delete_keeps_the_slot_but_marks_it_dead() {
        let dir = tempfile::tempdir().unwrap();
        let mut stream = FileRecordStream::new(dir.path().join("s.tbl"));
        let id = stream.append(rec(&[])).unwrap();
        stream.soft_delete(id).unwrap();
        let slot = stream.read(id).unwrap().unwrap();
        assert!(!slot.is_live);
    }

    #[test]
    fn vacuum_drops_tombstones_and_renumbers_densely() {
        let dir = tempfile::tempdir().unwrap();
        let mut stream = FileRecordStream::new(dir.path().join("s.tbl"));
        let a = stream.append(rec(&[("n", tinysql_ast::Value::Int(1))])).unwrap();
        let _b = stream.append(rec(&[("n", tinysql_ast::Value::Int(2))])).unwrap();
        let c = stream.append(rec(&[("n", tinysql_ast::Value::Int(3))])).unwrap();
        stream.soft_delete(a).unwrap();
        let remap = stream.vacuum().unwrap();
        let all = stream.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].slot_id, 0);
        assert_eq!(all[1].slot_id, 1);
        assert!(remap.contains(&(c, 1)));
    }

    #[test]
    fn reading_a_missing_file_is_an_empty_table_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let stream = FileRecordStream::new(dir.path().join("missing.tbl"));
        assert_eq!(stream.read_all().unwrap(), Vec::new());
    }
}
