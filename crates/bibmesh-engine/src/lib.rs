//! # bibmesh-engine
//!
//! Query composition over journal and taxonomy stores.
//!
//! This crate provides:
//! - `JournalQueryHandler` / `CategoryQueryHandler` (one store each)
//! - `JournalUploadHandler` / `CategoryUploadHandler` (file ingestion)
//! - `BasicQueryEngine` (fan-out, merge, taxonomy assembly, hydration)
//! - `FullQueryEngine` (conjunctive queries across the journal/taxonomy join)
//!
//! ## Query flow
//!
//! ```text
//! journal handlers ──fetch──> merged rows (first id wins)
//!                                   │
//! category handlers ──export──> TaxonomySnapshot ──hydrate──> Vec<Journal>
//! ```

pub mod basic;
pub mod error;
pub mod full;
pub mod handler;
pub mod snapshot;
pub mod upload;

pub use basic::{BasicQueryEngine, ids};
pub use error::{ConfigError, UploadError};
pub use full::FullQueryEngine;
pub use handler::{CategoryQueryHandler, JournalFetch, JournalQueryHandler, StoreLocation};
pub use snapshot::TaxonomySnapshot;
pub use upload::{CategoryUploadHandler, JournalUploadHandler};
