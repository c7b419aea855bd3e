//! # bibmesh-store
//!
//! Store adapters for the two data spaces the engine reconciles.
//!
//! This crate provides:
//! - `JournalStore` (one row per journal) with in-memory and JSONL backends
//! - `TaxonomyStore` (categories, areas, quartiles, journal aliases) with
//!   in-memory and JSON snapshot backends
//! - DOAJ CSV and Scimago JSON ingestion into typed rows
//!
//! Malformed input is rejected here, at the adapter boundary, so the engine
//! only ever sees typed rows and exports.
//!
//! ## Data model
//!
//! ```text
//! DOAJ CSV    -> JournalRow      -> JournalStore  (memory | JSONL)
//! Scimago JSON -> TaxonomyEntry  -> TaxonomyStore (memory | JSON snapshot)
//! ```

pub mod doaj;
pub mod error;
pub mod journal;
pub mod persist;
pub mod scimago;
pub mod taxonomy;

pub use doaj::{REQUIRED_COLUMNS, parse_journal_csv, read_journal_csv};
pub use error::StoreError;
pub use journal::{JournalStore, JournalTable, JsonlJournalStore, MemoryJournalStore};
pub use persist::{
    decode_journal_lines, decode_lines, encode_lines, read_document, read_journal_file,
    write_document, write_journal_file,
};
pub use scimago::{CategoryAssignment, TaxonomyEntry, parse_taxonomy_json, read_taxonomy_json};
pub use taxonomy::{JsonTaxonomyStore, MemoryTaxonomyStore, TaxonomyStore, TaxonomyTables};
