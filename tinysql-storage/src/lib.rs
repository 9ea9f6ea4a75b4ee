//! # tinysql-storage
//!
//! Per-table record streams (with tombstones) and per-(table, column)
//! secondary indexes (`spec.md` §2 item 7, §3, §6). The validator never
//! touches this crate; the optimizer reads index/cardinality facts through
//! it only indirectly (via the catalog's own bookkeeping); the executor is
//! the sole writer.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod engine;
mod error;
mod index;
mod record;
mod record_stream;

pub use self::{
    engine::StorageEngine,
    error::{IndexError, StorageError},
    index::{index_path, FileIndex, Index},
    record::{Record, Slot},
    record_stream::{record_stream_path, FileRecordStream, RecordStream},
};
