//! Basic query engine: fan-out over registered handlers, merge, hydrate.
//!
//! Every query re-fetches from every registered handler. Nothing is cached
//! between calls, so the engine only ever holds its handler lists.

use crate::handler::{CategoryQueryHandler, JournalFetch, JournalQueryHandler};
use crate::snapshot::TaxonomySnapshot;
use bibmesh_core::{
    Area, Category, Entity, Identifiable, Journal, JournalRow, TaxonomyExport,
    intersects_or_vacuous, normalize, normalize_set,
};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct BasicQueryEngine {
    journal_handlers: Vec<Arc<JournalQueryHandler>>,
    category_handlers: Vec<Arc<CategoryQueryHandler>>,
}

impl BasicQueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a journal handler.
    ///
    /// Returns `false` for an unconfigured handler or one already registered
    /// (same `Arc`).
    pub fn add_journal_handler(&mut self, handler: Arc<JournalQueryHandler>) -> bool {
        if !handler.is_configured()
            || self
                .journal_handlers
                .iter()
                .any(|registered| Arc::ptr_eq(registered, &handler))
        {
            return false;
        }
        self.journal_handlers.push(handler);
        true
    }

    /// Register a category handler; same rules as [`Self::add_journal_handler`].
    pub fn add_category_handler(&mut self, handler: Arc<CategoryQueryHandler>) -> bool {
        if !handler.is_configured()
            || self
                .category_handlers
                .iter()
                .any(|registered| Arc::ptr_eq(registered, &handler))
        {
            return false;
        }
        self.category_handlers.push(handler);
        true
    }

    pub fn clean_journal_handlers(&mut self) -> bool {
        self.journal_handlers.clear();
        true
    }

    pub fn clean_category_handlers(&mut self) -> bool {
        self.category_handlers.clear();
        true
    }

    pub fn journal_handlers(&self) -> &[Arc<JournalQueryHandler>] {
        &self.journal_handlers
    }

    pub fn category_handlers(&self) -> &[Arc<CategoryQueryHandler>] {
        &self.category_handlers
    }

    /// Run `request` on every journal handler and merge the rows.
    ///
    /// Source order is kept and a repeated id keeps its first row, so the
    /// first-registered handler wins. Ids compare trimmed, as `Journal` holds them.
    ///
    /// A handler that fails contributes nothing: its error is logged and the
    /// other handlers still merge. Malformed rows never reach this point, the
    /// stores reject them with [`StoreError::Malformed`] or a parse error,
    /// which surfaces here as that handler's failure.
    ///
    /// [`StoreError::Malformed`]: bibmesh_store::StoreError::Malformed
    pub fn collect_journal_rows(&self, request: JournalFetch<'_>) -> Vec<JournalRow> {
        let mut seen = BTreeSet::new();
        let mut merged = Vec::new();

        for (index, handler) in self.journal_handlers.iter().enumerate() {
            match handler.fetch(request) {
                Ok(rows) => {
                    for row in rows {
                        if seen.insert(row.id.trim().to_string()) {
                            merged.push(row);
                        }
                    }
                }
                Err(error) => tracing::warn!(
                    handler = index,
                    location = handler.db_path_or_url().unwrap_or("<shared>"),
                    fetch = request.name(),
                    %error,
                    "journal handler failed; excluded from merge"
                ),
            }
        }

        tracing::debug!(
            fetch = request.name(),
            handlers = self.journal_handlers.len(),
            rows = merged.len(),
            "journal rows merged"
        );
        merged
    }

    /// Merged export of every category handler, in registration order.
    pub fn collect_taxonomy_export(&self) -> TaxonomyExport {
        let mut combined = TaxonomyExport::default();
        for (index, handler) in self.category_handlers.iter().enumerate() {
            match handler.export() {
                Ok(export) => combined.merge(export),
                Err(error) => tracing::warn!(
                    handler = index,
                    location = handler.db_path_or_url().unwrap_or("<shared>"),
                    %error,
                    "category handler failed; excluded from merge"
                ),
            }
        }
        combined
    }

    /// Materialize the taxonomy from all category handlers.
    pub fn build_taxonomy(&self) -> TaxonomySnapshot {
        let snapshot = TaxonomySnapshot::from_export(self.collect_taxonomy_export());
        tracing::debug!(
            categories = snapshot.graph().category_count(),
            areas = snapshot.graph().area_count(),
            aliases = snapshot.export().journal_alias.len(),
            "taxonomy materialized"
        );
        snapshot
    }

    /// Turn merged rows into linked journals.
    ///
    /// The taxonomy is only materialized when there is something to link.
    pub fn hydrate(&self, rows: &[JournalRow]) -> Vec<Journal> {
        if rows.is_empty() {
            return Vec::new();
        }
        let snapshot = self.build_taxonomy();
        rows.iter().map(|row| snapshot.hydrate(row)).collect()
    }

    pub(crate) fn journals(&self, request: JournalFetch<'_>) -> Vec<Journal> {
        self.hydrate(&self.collect_journal_rows(request))
    }

    /// Journal, category or area addressed by `identifier`, in that order.
    pub fn get_entity_by_id(&self, identifier: &str) -> Option<Entity> {
        if let Some(journal) = self.journals(JournalFetch::ById(identifier)).into_iter().next() {
            return Some(Entity::Journal(journal));
        }
        if normalize(identifier).is_empty() {
            return None;
        }

        let snapshot = self.build_taxonomy();
        let graph = snapshot.graph();
        graph
            .find_category(identifier)
            .map(Entity::Category)
            .or_else(|| graph.find_area(identifier).map(Entity::Area))
    }

    pub fn get_all_journals(&self) -> Vec<Journal> {
        self.journals(JournalFetch::All)
    }

    pub fn get_journals_with_title(&self, title_part: &str) -> Vec<Journal> {
        self.journals(JournalFetch::ByTitle(title_part))
    }

    pub fn get_journals_published_by(&self, publisher_part: &str) -> Vec<Journal> {
        self.journals(JournalFetch::ByPublisher(publisher_part))
    }

    pub fn get_journals_with_license<I, S>(&self, licenses: I) -> Vec<Journal>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let licenses: Vec<String> = licenses
            .into_iter()
            .map(|license| license.as_ref().to_string())
            .collect();
        self.journals(JournalFetch::ByLicense(&licenses))
    }

    pub fn get_journals_with_apc(&self) -> Vec<Journal> {
        self.journals(JournalFetch::WithApc)
    }

    pub fn get_journals_with_doaj_seal(&self) -> Vec<Journal> {
        self.journals(JournalFetch::WithDoajSeal)
    }

    pub fn get_all_categories(&self) -> Vec<Category> {
        self.build_taxonomy().graph().categories()
    }

    pub fn get_all_areas(&self) -> Vec<Area> {
        self.build_taxonomy().graph().areas()
    }

    /// Categories holding any requested quartile; all categories when none requested.
    pub fn get_categories_with_quartile<I, S>(&self, quartiles: I) -> Vec<Category>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let request = normalize_set(quartiles);
        let mut categories = self.get_all_categories();
        categories.retain(|category| intersects_or_vacuous(&request, category.quartiles()));
        categories
    }

    pub fn get_categories_assigned_to_areas<I, S>(&self, areas: I) -> Vec<Category>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let request = normalize_set(areas);
        let mut categories = self.get_all_categories();
        categories.retain(|category| intersects_or_vacuous(&request, category.area_ids()));
        categories
    }

    pub fn get_areas_assigned_to_categories<I, S>(&self, categories: I) -> Vec<Area>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let request = normalize_set(categories);
        let mut areas = self.get_all_areas();
        areas.retain(|area| intersects_or_vacuous(&request, area.category_ids()));
        areas
    }
}

/// Ids of `entities`, for logging and assertions.
pub fn ids<T: Identifiable>(entities: &[T]) -> Vec<&str> {
    entities.iter().map(Identifiable::id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibmesh_store::{
        CategoryAssignment, JournalStore, MemoryJournalStore, MemoryTaxonomyStore, TaxonomyEntry,
        TaxonomyStore,
    };

    const NONE: [&str; 0] = [];

    fn journal_handler(rows: Vec<JournalRow>) -> Arc<JournalQueryHandler> {
        Arc::new(JournalQueryHandler::with_store(Arc::new(
            MemoryJournalStore::from_rows(rows),
        )))
    }

    fn category_handler(entries: Vec<TaxonomyEntry>) -> Arc<CategoryQueryHandler> {
        let store = MemoryTaxonomyStore::new();
        store.ingest(entries).expect("ingest succeeds");
        Arc::new(CategoryQueryHandler::with_store(Arc::new(store)))
    }

    fn ranked(identifier: &str, categories: &[(&str, &str)], areas: &[&str]) -> TaxonomyEntry {
        TaxonomyEntry {
            identifiers: vec![identifier.to_string()],
            categories: categories
                .iter()
                .map(|(id, quartile)| CategoryAssignment {
                    id: id.to_string(),
                    quartile: Some(quartile.to_string()),
                })
                .collect(),
            areas: areas.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn engine() -> BasicQueryEngine {
        let mut engine = BasicQueryEngine::new();
        engine.add_journal_handler(journal_handler(vec![
            JournalRow {
                title: "Oncology Letters".into(),
                publisher: "Spandidos".into(),
                apc: true,
                ..JournalRow::with_id("1792-1074")
            },
            JournalRow {
                title: "Open Biology".into(),
                publisher: "The Royal Society".into(),
                license: "CC BY".into(),
                doaj_seal: true,
                ..JournalRow::with_id("2046-2441")
            },
        ]));
        engine.add_category_handler(category_handler(vec![
            ranked("17921074", &[("Oncology", "Q2")], &["Medicine"]),
            ranked(
                "2046-2441",
                &[("Biochemistry", "Q1"), ("Immunology", "Q1")],
                &["Biochemistry, Genetics and Molecular Biology"],
            ),
        ]));
        engine
    }

    #[test]
    fn registration_is_identity_based() {
        let mut engine = BasicQueryEngine::new();
        let handler = journal_handler(Vec::new());
        assert!(engine.add_journal_handler(Arc::clone(&handler)));
        assert!(!engine.add_journal_handler(Arc::clone(&handler)));
        assert!(engine.add_journal_handler(journal_handler(Vec::new())));
        assert_eq!(engine.journal_handlers().len(), 2);

        assert!(!engine.add_journal_handler(Arc::new(JournalQueryHandler::new())));
        assert!(!engine.add_category_handler(Arc::new(CategoryQueryHandler::new())));

        assert!(engine.clean_journal_handlers());
        assert!(engine.journal_handlers().is_empty());
        assert!(engine.clean_category_handlers());
    }

    #[test]
    fn journals_are_hydrated_through_aliases() {
        let engine = engine();
        let journals = engine.get_all_journals();
        assert_eq!(ids(&journals), vec!["1792-1074", "2046-2441"]);

        assert_eq!(ids(journals[0].categories()), vec!["Oncology"]);
        assert_eq!(ids(journals[0].areas()), vec!["Medicine"]);
        assert_eq!(ids(journals[1].categories()), vec!["Biochemistry", "Immunology"]);
    }

    #[test]
    fn journal_predicates_delegate_to_handlers() {
        let engine = engine();
        assert_eq!(ids(&engine.get_journals_with_title("open")), vec!["2046-2441"]);
        assert_eq!(ids(&engine.get_journals_published_by("spandidos")), vec!["1792-1074"]);
        assert_eq!(ids(&engine.get_journals_with_license(["cc-by"])), vec!["2046-2441"]);
        assert_eq!(ids(&engine.get_journals_with_apc()), vec!["1792-1074"]);
        assert_eq!(ids(&engine.get_journals_with_doaj_seal()), vec!["2046-2441"]);
    }

    #[test]
    fn entity_lookup_tries_journal_then_category_then_area() {
        let engine = engine();

        match engine.get_entity_by_id("17921074") {
            Some(Entity::Journal(journal)) => assert_eq!(journal.title(), "Oncology Letters"),
            other => panic!("expected journal, got {other:?}"),
        }
        match engine.get_entity_by_id("oncology") {
            Some(Entity::Category(category)) => assert_eq!(category.quartiles(), ["Q2"]),
            other => panic!("expected category, got {other:?}"),
        }
        match engine.get_entity_by_id("MEDICINE") {
            Some(Entity::Area(area)) => assert_eq!(area.category_ids(), vec!["Oncology"]),
            other => panic!("expected area, got {other:?}"),
        }
        assert!(engine.get_entity_by_id("nothing-here").is_none());
        assert!(engine.get_entity_by_id("  ").is_none());
    }

    #[test]
    fn taxonomy_filters_use_vacuous_match() {
        let engine = engine();
        assert_eq!(
            ids(&engine.get_categories_with_quartile(["q1"])),
            vec!["Biochemistry", "Immunology"]
        );
        assert_eq!(engine.get_categories_with_quartile(NONE).len(), 3);
        assert_eq!(ids(&engine.get_categories_assigned_to_areas(["medicine"])), vec!["Oncology"]);
        assert_eq!(
            ids(&engine.get_areas_assigned_to_categories(["Immunology"])),
            vec!["Biochemistry, Genetics and Molecular Biology"]
        );
        assert_eq!(engine.get_areas_assigned_to_categories(NONE).len(), 2);
    }

    #[test]
    fn failing_handler_is_excluded_from_merge() {
        let path = std::env::temp_dir().join(format!(
            "bibmesh-engine-broken-{}.jsonl",
            std::process::id()
        ));
        std::fs::write(&path, "not json\n").expect("fixture should write");

        let mut broken = JournalQueryHandler::new();
        broken
            .set_db_path_or_url(path.to_str().expect("utf-8 temp path"))
            .expect("path accepted");

        let mut engine = engine();
        assert!(engine.add_journal_handler(Arc::new(broken)));
        assert_eq!(engine.get_all_journals().len(), 2);

        let _ = std::fs::remove_file(path);
    }
}
