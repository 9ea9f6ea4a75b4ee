//! # tinysql-catalog
//!
//! The persistent mapping of table names to column lists, primary keys,
//! foreign keys, index sets, and record counts (`spec.md` §2 item 6, §3,
//! §6). The validator, optimizer, and executor all depend on this crate
//! only through the [`Catalog`] trait.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod catalog;
mod document;
mod error;
mod table;

pub use self::{
    catalog::{catalog_path, indexed_columns, Catalog, FileCatalog},
    document::{CatalogDocument, TableEntry},
    error::SchemaError,
    table::{ForeignKeyRef, TableMeta},
};
