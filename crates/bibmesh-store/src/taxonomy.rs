//! Taxonomy stores: categories, areas, quartiles and journal aliases.
//!
//! ```text
//! journal             canonical id
//! alias               raw alias -> canonical id        (first writer wins)
//! category            id
//! area                id
//! category_quartile   category -> {quartile}
//! category_area       category -> {area}
//! journal_category    journal -> {category -> {quartile}}
//! journal_area        journal -> {area}
//! ```
//!
//! Every table has insert-or-ignore semantics: ingesting the same entry
//! twice leaves the tables unchanged.

use crate::error::StoreError;
use crate::persist::{read_document, write_document};
use crate::scimago::TaxonomyEntry;
use bibmesh_core::{
    AreaExport, AreaRow, CategoryExport, CategoryRow, EntityKind, TaxonomyEntityRow,
    TaxonomyExport, intersects_or_vacuous, normalize, normalize_set, strip_hyphens,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Contract every taxonomy store honors.
///
/// Listing methods are derived from [`TaxonomyStore::export_all`]; stores
/// with a cheaper native path may override them.
pub trait TaxonomyStore: Send + Sync {
    fn export_all(&self) -> Result<TaxonomyExport, StoreError>;

    /// Category, area or journal addressed by `identifier`, tagged by kind.
    fn fetch_entity_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<TaxonomyEntityRow>, StoreError>;

    /// Canonical journal id for an alias.
    fn resolve_journal(&self, identifier: &str) -> Result<Option<String>, StoreError>;

    /// Insert ranked journals. Returns the number of entries ingested.
    fn ingest(&self, entries: Vec<TaxonomyEntry>) -> Result<usize, StoreError>;

    fn fetch_categories(&self) -> Result<Vec<CategoryRow>, StoreError> {
        Ok(category_rows(&self.export_all()?))
    }

    fn fetch_areas(&self) -> Result<Vec<AreaRow>, StoreError> {
        Ok(area_rows(&self.export_all()?))
    }

    fn fetch_categories_with_quartiles(
        &self,
        quartiles: &[String],
    ) -> Result<Vec<CategoryRow>, StoreError> {
        let request = normalize_set(quartiles);
        let mut rows = self.fetch_categories()?;
        rows.retain(|row| intersects_or_vacuous(&request, &row.quartiles));
        Ok(rows)
    }

    fn fetch_categories_assigned_to_areas(
        &self,
        areas: &[String],
    ) -> Result<Vec<CategoryRow>, StoreError> {
        let request = normalize_set(areas);
        let mut rows = self.fetch_categories()?;
        rows.retain(|row| intersects_or_vacuous(&request, &row.areas));
        Ok(rows)
    }

    fn fetch_areas_assigned_to_categories(
        &self,
        categories: &[String],
    ) -> Result<Vec<AreaRow>, StoreError> {
        let request = normalize_set(categories);
        let mut rows = self.fetch_areas()?;
        rows.retain(|row| intersects_or_vacuous(&request, &row.categories));
        Ok(rows)
    }

    /// Category id -> quartiles for one canonical journal id.
    fn fetch_journal_categories(
        &self,
        journal_id: &str,
    ) -> Result<BTreeMap<String, BTreeSet<String>>, StoreError> {
        Ok(self
            .export_all()?
            .journal_categories
            .remove(journal_id)
            .unwrap_or_default())
    }

    fn fetch_journal_areas(&self, journal_id: &str) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .export_all()?
            .journal_areas
            .remove(journal_id)
            .unwrap_or_default())
    }
}

fn category_rows(export: &TaxonomyExport) -> Vec<CategoryRow> {
    export
        .categories
        .iter()
        .map(|(id, data)| CategoryRow {
            id: id.clone(),
            quartiles: data.quartiles.iter().cloned().collect(),
            areas: data.areas.iter().cloned().collect(),
        })
        .collect()
}

fn area_rows(export: &TaxonomyExport) -> Vec<AreaRow> {
    export
        .areas
        .iter()
        .map(|(id, data)| AreaRow {
            id: id.clone(),
            categories: data.categories.iter().cloned().collect(),
        })
        .collect()
}

/// Relational-shaped taxonomy tables, serializable as one JSON snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyTables {
    #[serde(default)]
    journals: BTreeSet<String>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
    #[serde(default)]
    categories: BTreeSet<String>,
    #[serde(default)]
    areas: BTreeSet<String>,
    #[serde(default)]
    category_quartiles: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    category_areas: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    journal_categories: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
    #[serde(default)]
    journal_areas: BTreeMap<String, BTreeSet<String>>,
}

impl TaxonomyTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal_count(&self) -> usize {
        self.journals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journals.is_empty() && self.categories.is_empty() && self.areas.is_empty()
    }

    /// Insert one ranked journal and its links.
    ///
    /// The canonical id is the first identifier; an entry without
    /// identifiers gets a fresh UUID. Every category of the entry is linked
    /// to every area of the entry.
    pub fn insert_entry(&mut self, entry: &TaxonomyEntry) {
        let canonical = entry
            .canonical_id()
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        self.journals.insert(canonical.clone());

        let identifiers = if entry.identifiers.is_empty() {
            vec![canonical.clone()]
        } else {
            entry.identifiers.clone()
        };
        for identifier in &identifiers {
            for alias in [identifier.clone(), strip_hyphens(identifier)] {
                if !alias.is_empty() {
                    self.aliases.entry(alias).or_insert_with(|| canonical.clone());
                }
            }
        }

        for area in &entry.areas {
            self.areas.insert(area.clone());
            self.journal_areas
                .entry(canonical.clone())
                .or_default()
                .insert(area.clone());
        }

        for assignment in &entry.categories {
            self.categories.insert(assignment.id.clone());
            if let Some(quartile) = &assignment.quartile {
                self.category_quartiles
                    .entry(assignment.id.clone())
                    .or_default()
                    .insert(quartile.clone());
            }
            for area in &entry.areas {
                self.category_areas
                    .entry(assignment.id.clone())
                    .or_default()
                    .insert(area.clone());
            }
            let quartiles = self
                .journal_categories
                .entry(canonical.clone())
                .or_default()
                .entry(assignment.id.clone())
                .or_default();
            if let Some(quartile) = &assignment.quartile {
                quartiles.insert(quartile.clone());
            }
        }
    }

    /// Bulk export. Alias keys are normalized; when two raw aliases
    /// normalize alike, the first in sorted order keeps its mapping.
    pub fn export(&self) -> TaxonomyExport {
        let mut export = TaxonomyExport::default();

        for category in &self.categories {
            export.categories.insert(
                category.clone(),
                CategoryExport {
                    quartiles: self
                        .category_quartiles
                        .get(category)
                        .cloned()
                        .unwrap_or_default(),
                    areas: self.category_areas.get(category).cloned().unwrap_or_default(),
                },
            );
        }

        for area in &self.areas {
            export.areas.insert(area.clone(), AreaExport::default());
        }
        for (category, areas) in &self.category_areas {
            for area in areas {
                export
                    .areas
                    .entry(area.clone())
                    .or_default()
                    .categories
                    .insert(category.clone());
            }
        }

        export.journal_categories = self.journal_categories.clone();
        export.journal_areas = self.journal_areas.clone();

        for (alias, canonical) in &self.aliases {
            let key = normalize(alias);
            if !key.is_empty() {
                export
                    .journal_alias
                    .entry(key)
                    .or_insert_with(|| canonical.clone());
            }
        }

        export
    }

    /// Lookup order: category, area, then journal alias, all by normalized id.
    pub fn entity_by_identifier(&self, identifier: &str) -> Option<TaxonomyEntityRow> {
        let key = normalize(identifier);
        if key.is_empty() {
            return None;
        }

        if let Some(category) = self.categories.iter().find(|id| normalize(id) == key) {
            return Some(TaxonomyEntityRow {
                kind: EntityKind::Category,
                id: category.clone(),
                quartiles: sorted(self.category_quartiles.get(category)),
                areas: sorted(self.category_areas.get(category)),
                categories: Vec::new(),
            });
        }

        if let Some(area) = self.areas.iter().find(|id| normalize(id) == key) {
            let categories = self
                .category_areas
                .iter()
                .filter(|(_, areas)| areas.contains(area))
                .map(|(category, _)| category.clone())
                .collect();
            return Some(TaxonomyEntityRow {
                kind: EntityKind::Area,
                id: area.clone(),
                quartiles: Vec::new(),
                areas: Vec::new(),
                categories,
            });
        }

        let (_, journal) = self
            .aliases
            .iter()
            .find(|(alias, _)| normalize(alias) == key)?;
        Some(TaxonomyEntityRow {
            kind: EntityKind::Journal,
            id: journal.clone(),
            quartiles: Vec::new(),
            areas: sorted(self.journal_areas.get(journal)),
            categories: self
                .journal_categories
                .get(journal)
                .map(|links| links.keys().cloned().collect())
                .unwrap_or_default(),
        })
    }

    /// Canonical journal id for `identifier` or its hyphen-stripped form,
    /// compared case-insensitively against the raw aliases.
    pub fn resolve_journal(&self, identifier: &str) -> Option<String> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        [identifier.to_string(), strip_hyphens(identifier)]
            .iter()
            .find_map(|variant| {
                self.aliases
                    .iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(variant))
                    .map(|(_, journal)| journal.clone())
            })
    }
}

fn sorted(values: Option<&BTreeSet<String>>) -> Vec<String> {
    values
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default()
}

/// Shared in-process taxonomy store; clones see the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaxonomyStore {
    tables: Arc<RwLock<TaxonomyTables>>,
}

impl MemoryTaxonomyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tables<T>(&self, f: impl FnOnce(&TaxonomyTables) -> T) -> Result<T, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(f(&tables))
    }
}

impl TaxonomyStore for MemoryTaxonomyStore {
    fn export_all(&self) -> Result<TaxonomyExport, StoreError> {
        self.with_tables(TaxonomyTables::export)
    }

    fn fetch_entity_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<TaxonomyEntityRow>, StoreError> {
        self.with_tables(|tables| tables.entity_by_identifier(identifier))
    }

    fn resolve_journal(&self, identifier: &str) -> Result<Option<String>, StoreError> {
        self.with_tables(|tables| tables.resolve_journal(identifier))
    }

    fn ingest(&self, entries: Vec<TaxonomyEntry>) -> Result<usize, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        for entry in &entries {
            tables.insert_entry(entry);
        }
        Ok(entries.len())
    }
}

/// Taxonomy store persisted as a JSON snapshot of [`TaxonomyTables`].
///
/// A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonTaxonomyStore {
    path: PathBuf,
}

impl JsonTaxonomyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<TaxonomyTables, StoreError> {
        Ok(read_document(&self.path)?.unwrap_or_default())
    }

    fn save(&self, tables: &TaxonomyTables) -> Result<(), StoreError> {
        write_document(&self.path, tables)
    }
}

impl TaxonomyStore for JsonTaxonomyStore {
    fn export_all(&self) -> Result<TaxonomyExport, StoreError> {
        Ok(self.load()?.export())
    }

    fn fetch_entity_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<TaxonomyEntityRow>, StoreError> {
        Ok(self.load()?.entity_by_identifier(identifier))
    }

    fn resolve_journal(&self, identifier: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.resolve_journal(identifier))
    }

    fn ingest(&self, entries: Vec<TaxonomyEntry>) -> Result<usize, StoreError> {
        let mut tables = self.load()?;
        for entry in &entries {
            tables.insert_entry(entry);
        }
        self.save(&tables)?;
        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            journals = tables.journal_count(),
            "taxonomy store persisted"
        );
        Ok(entries.len())
    }
}
