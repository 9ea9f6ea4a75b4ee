use std::fmt;

/// An error raised by the record-stream collaborator (`spec.md` §7): a
/// record file is missing or unreadable when expected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// `slot_id` does not name a record in this table's stream.
    SlotNotFound(u64),
    /// The record file could not be read or written.
    Io(String),
    /// The record file's contents could not be decoded.
    Corrupt(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::SlotNotFound(id) => write!(f, "no record at slot {}", id),
            StorageError::Io(message) => write!(f, "storage I/O error: {}", message),
            StorageError::Corrupt(message) => write!(f, "corrupt record file: {}", message),
        }
    }
}

impl std::error::Error for StorageError {}

/// An error raised by the index collaborator (`spec.md` §7): an index
/// operation cannot complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexError {
    /// The index file could not be read or written.
    Io(String),
    /// The index file's contents could not be decoded.
    Corrupt(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::Io(message) => write!(f, "index I/O error: {}", message),
            IndexError::Corrupt(message) => write!(f, "corrupt index file: {}", message),
        }
    }
}

impl std::error::Error for IndexError {}
