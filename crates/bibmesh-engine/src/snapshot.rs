//! Per-query taxonomy snapshot: the materialized graph plus the merged export.
//!
//! Built fresh for every taxonomy-dependent query. The graph answers node
//! lookups; the export keeps the alias and journal-link maps needed to
//! hydrate journal rows.

use bibmesh_core::{Journal, JournalRow, Taxonomy, TaxonomyExport};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TaxonomySnapshot {
    graph: Arc<Taxonomy>,
    export: TaxonomyExport,
}

impl TaxonomySnapshot {
    pub fn from_export(export: TaxonomyExport) -> Self {
        let graph = Arc::new(Taxonomy::from_export(&export));
        Self { graph, export }
    }

    pub fn graph(&self) -> &Arc<Taxonomy> {
        &self.graph
    }

    pub fn export(&self) -> &TaxonomyExport {
        &self.export
    }

    /// Canonical taxonomy journal id for a row: the first of its known
    /// identifiers that resolves through the alias map.
    pub fn resolve_row(&self, row: &JournalRow) -> Option<&str> {
        row.known_identifiers()
            .into_iter()
            .find_map(|identifier| self.export.resolve_alias(identifier))
    }

    /// Journal object for `row`, linked to the categories and areas of its
    /// canonical id. Unresolved rows come back unlinked.
    pub fn hydrate(&self, row: &JournalRow) -> Journal {
        let mut journal = Journal::from_row(row);
        let Some(canonical) = self.resolve_row(row) else {
            return journal;
        };

        if let Some(links) = self.export.journal_categories.get(canonical) {
            for category_id in links.keys() {
                if let Some(category) = self.graph.category(category_id) {
                    journal.add_category(category);
                }
            }
        }
        if let Some(areas) = self.export.journal_areas.get(canonical) {
            for area_id in areas {
                if let Some(area) = self.graph.area(area_id) {
                    journal.add_area(area);
                }
            }
        }
        journal
    }
}
