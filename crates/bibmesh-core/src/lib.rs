//! # bibmesh-core
//!
//! Domain layer shared by stores and the query engine.
//!
//! This crate provides:
//! - `normalize` (the single cross-store comparison key)
//! - `Journal`, `Category`, `Area` (the entities) and the `Identifiable` surface
//! - `Taxonomy` (index-based category/area arena with mutual links)
//! - `JournalRow` and `TaxonomyExport` (typed shapes exchanged with stores)
//!
//! It does not read files or talk to stores. Those concerns live in
//! `bibmesh-store`; fan-out and reconciliation live in `bibmesh-engine`.
//!
//! ## Data model
//!
//! ```text
//! Journal ──> Category <──> Area
//!    └──────────────────────^
//! ```

pub mod entity;
pub mod export;
pub mod identifier;
pub mod journal;
pub mod row;
pub mod taxonomy;

pub use entity::{Entity, EntityCore, Identifiable};
pub use export::{AreaExport, CategoryExport, TaxonomyExport};
pub use identifier::{intersects_or_vacuous, normalize, normalize_opt, normalize_set, strip_hyphens};
pub use journal::Journal;
pub use row::{AreaRow, CategoryRow, EntityKind, JOURNAL_COLUMNS, JournalRow, TaxonomyEntityRow};
pub use taxonomy::{Area, Category, Taxonomy};
