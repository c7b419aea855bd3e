use bibmesh_core::{Entity, Identifiable, JournalRow, Taxonomy, TaxonomyExport};
use bibmesh_engine::{
    BasicQueryEngine, CategoryQueryHandler, CategoryUploadHandler, FullQueryEngine,
    JournalQueryHandler, JournalUploadHandler, ids,
};
use bibmesh_store::{
    CategoryAssignment, JournalStore, MemoryJournalStore, MemoryTaxonomyStore, TaxonomyEntry,
    TaxonomyStore,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const NONE: [&str; 0] = [];

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "bibmesh-engine-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn journals(rows: Vec<JournalRow>) -> Arc<JournalQueryHandler> {
    Arc::new(JournalQueryHandler::with_store(Arc::new(
        MemoryJournalStore::from_rows(rows),
    )))
}

fn taxonomy(entries: Vec<TaxonomyEntry>) -> Arc<CategoryQueryHandler> {
    let store = MemoryTaxonomyStore::new();
    store.ingest(entries).expect("taxonomy ingest succeeds");
    Arc::new(CategoryQueryHandler::with_store(Arc::new(store)))
}

fn taxonomy_from_export(export: TaxonomyExport) -> Arc<CategoryQueryHandler> {
    struct FixedExport(TaxonomyExport);

    impl TaxonomyStore for FixedExport {
        fn export_all(&self) -> Result<TaxonomyExport, bibmesh_store::StoreError> {
            Ok(self.0.clone())
        }

        fn fetch_entity_by_identifier(
            &self,
            _identifier: &str,
        ) -> Result<Option<bibmesh_core::TaxonomyEntityRow>, bibmesh_store::StoreError> {
            Ok(None)
        }

        fn resolve_journal(
            &self,
            identifier: &str,
        ) -> Result<Option<String>, bibmesh_store::StoreError> {
            Ok(self.0.resolve_alias(identifier).map(str::to_string))
        }

        fn ingest(&self, _entries: Vec<TaxonomyEntry>) -> Result<usize, bibmesh_store::StoreError> {
            Ok(0)
        }
    }

    Arc::new(CategoryQueryHandler::with_store(Arc::new(FixedExport(export))))
}

fn ranked(identifiers: &[&str], categories: &[(&str, &str)], areas: &[&str]) -> TaxonomyEntry {
    TaxonomyEntry {
        identifiers: identifiers.iter().map(|s| s.to_string()).collect(),
        categories: categories
            .iter()
            .map(|(id, quartile)| CategoryAssignment {
                id: id.to_string(),
                quartile: Some(quartile.to_string()),
            })
            .collect(),
        areas: areas.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn category_area_links_stay_mutual_after_materialization() {
    let mut engine = BasicQueryEngine::new();
    engine.add_category_handler(taxonomy(vec![
        ranked(&["J1"], &[("Oncology", "Q1"), ("Hematology", "Q2")], &["Medicine"]),
        ranked(&["J2"], &[("Oncology", "Q3")], &["Biochemistry"]),
    ]));

    for category in engine.get_all_categories() {
        for area in category.areas() {
            assert!(area.category_ids().contains(&category.id()));
        }
    }
    for area in engine.get_all_areas() {
        for category in area.categories() {
            assert!(category.area_ids().contains(&area.id()));
        }
    }
}

#[test]
fn duplicate_journal_id_keeps_first_registered_row() {
    let mut engine = BasicQueryEngine::new();
    engine.add_journal_handler(journals(vec![JournalRow {
        title: "From first".into(),
        ..JournalRow::with_id("X")
    }]));
    engine.add_journal_handler(journals(vec![
        JournalRow {
            title: "From second".into(),
            ..JournalRow::with_id("X")
        },
        JournalRow::with_id("Y"),
    ]));

    let merged = engine.get_all_journals();
    assert_eq!(ids(&merged), vec!["X", "Y"]);
    assert_eq!(merged[0].title(), "From first");
}

#[test]
fn padded_journal_id_deduplicates_with_its_trimmed_form() {
    let mut engine = BasicQueryEngine::new();
    engine.add_journal_handler(journals(vec![JournalRow {
        title: "Padded".into(),
        ..JournalRow::with_id(" X ")
    }]));
    engine.add_journal_handler(journals(vec![JournalRow {
        title: "Bare".into(),
        ..JournalRow::with_id("X")
    }]));

    let merged = engine.get_all_journals();
    assert_eq!(ids(&merged), vec!["X"]);
    assert_eq!(merged[0].title(), "Padded");
}

#[test]
fn empty_quartile_request_returns_every_category() {
    let mut engine = BasicQueryEngine::new();
    engine.add_category_handler(taxonomy(vec![
        ranked(&["J1"], &[("Oncology", "Q1")], &["Medicine"]),
        ranked(&["J2"], &[("Virology", "Q4")], &["Immunology and Microbiology"]),
    ]));

    assert_eq!(
        ids(&engine.get_categories_with_quartile(NONE)),
        ids(&engine.get_all_categories())
    );
    assert_eq!(
        ids(&engine.get_categories_with_quartile(["", "  "])),
        vec!["Oncology", "Virology"]
    );
}

#[test]
fn hyphenated_identifier_resolves_through_alias_map() {
    let mut export = TaxonomyExport::default();
    export.journal_alias.insert("15206149".into(), "J1".into());
    export
        .journal_categories
        .entry("J1".into())
        .or_default()
        .insert("Signal Processing".into(), ["Q1".to_string()].into());
    export
        .journal_areas
        .insert("J1".into(), ["Engineering".to_string()].into());
    export.categories.insert(
        "Signal Processing".into(),
        bibmesh_core::CategoryExport {
            quartiles: ["Q1".to_string()].into(),
            areas: ["Engineering".to_string()].into(),
        },
    );

    let mut engine = BasicQueryEngine::new();
    engine.add_journal_handler(journals(vec![JournalRow {
        identifiers: vec!["1520-6149".into()],
        ..JournalRow::with_id("10.1/x")
    }]));
    engine.add_category_handler(taxonomy_from_export(export));

    let journal = engine
        .get_all_journals()
        .into_iter()
        .next()
        .expect("journal returned");
    let rendered = json!({
        "id": journal.id(),
        "categories": ids(journal.categories()),
        "areas": ids(journal.areas()),
    });
    insta::assert_json_snapshot!(rendered, @r#"
    {
      "areas": [
        "Engineering"
      ],
      "categories": [
        "Signal Processing"
      ],
      "id": "10.1/x"
    }
    "#);
}

#[test]
fn diamond_query_drops_apc_journals() {
    let mut engine = FullQueryEngine::new();
    engine.add_journal_handler(journals(vec![
        JournalRow {
            apc: false,
            ..JournalRow::with_id("A")
        },
        JournalRow {
            apc: true,
            ..JournalRow::with_id("B")
        },
    ]));
    engine.add_category_handler(taxonomy(vec![
        ranked(&["A"], &[("C1", "Q1")], &["bio"]),
        ranked(&["B"], &[], &["bio"]),
    ]));

    let diamonds = engine.get_diamond_journals_in_areas_and_categories_with_quartile(
        ["bio"],
        ["C1"],
        ["Q1"],
    );
    assert_eq!(ids(&diamonds), vec!["A"]);
}

#[test]
fn category_and_quartile_match_on_the_same_link() {
    let mut engine = FullQueryEngine::new();
    engine.add_journal_handler(journals(vec![JournalRow::with_id("J")]));
    engine.add_category_handler(taxonomy(vec![ranked(
        &["J"],
        &[("C1", "Q1"), ("C2", "Q2")],
        &["bio"],
    )]));

    assert!(
        engine
            .get_journals_in_categories_with_quartile(["C1"], ["Q2"])
            .is_empty()
    );
    assert!(
        engine
            .get_diamond_journals_in_areas_and_categories_with_quartile(["bio"], ["C1"], ["Q2"])
            .is_empty()
    );
    assert_eq!(
        ids(&engine.get_journals_in_categories_with_quartile(["C1"], ["Q1"])),
        vec!["J"]
    );
    assert_eq!(
        ids(&engine.get_diamond_journals_in_areas_and_categories_with_quartile(
            ["bio"],
            ["C1"],
            ["Q1"]
        )),
        vec!["J"]
    );
}

#[test]
fn unregistered_engine_answers_empty() {
    let engine = FullQueryEngine::new();

    assert!(engine.get_entity_by_id("anything").is_none());
    assert!(engine.get_all_journals().is_empty());
    assert!(engine.get_journals_with_title("x").is_empty());
    assert!(engine.get_journals_published_by("x").is_empty());
    assert!(engine.get_journals_with_license(["CC BY"]).is_empty());
    assert!(engine.get_journals_with_apc().is_empty());
    assert!(engine.get_journals_with_doaj_seal().is_empty());
    assert!(engine.get_all_categories().is_empty());
    assert!(engine.get_all_areas().is_empty());
    assert!(engine.get_categories_with_quartile(["Q1"]).is_empty());
    assert!(engine.get_categories_assigned_to_areas(NONE).is_empty());
    assert!(engine.get_areas_assigned_to_categories(NONE).is_empty());
    assert!(engine.get_journals_in_categories_with_quartile(NONE, NONE).is_empty());
    assert!(engine.get_journals_in_areas_with_license(NONE, NONE).is_empty());
    assert!(
        engine
            .get_diamond_journals_in_areas_and_categories_with_quartile(NONE, NONE, NONE)
            .is_empty()
    );
}

#[test]
fn materialized_taxonomy_re_exports_unchanged() {
    let store = MemoryTaxonomyStore::new();
    store
        .ingest(vec![
            ranked(&["J1"], &[("Oncology", "Q1"), ("Hematology", "Q2")], &["Medicine"]),
            ranked(&["J2"], &[("Oncology", "Q3")], &["Medicine", "Biochemistry"]),
        ])
        .expect("ingest succeeds");
    let export = store.export_all().expect("export succeeds");

    let categories_and_areas = TaxonomyExport {
        categories: export.categories.clone(),
        areas: export.areas.clone(),
        ..TaxonomyExport::default()
    };
    let round_trip = Taxonomy::from_export(&export).to_export();
    assert_eq!(round_trip, categories_and_areas);

    let merged = TaxonomyExport::merge_all([round_trip, categories_and_areas.clone()]);
    assert_eq!(merged, categories_and_areas);
}

#[test]
fn uploads_feed_queries_through_shared_stores() {
    let temp = TempDirGuard::new("uploads");
    let csv = temp.path().join("doaj.csv");
    fs::write(
        &csv,
        "Journal title,Journal ISSN (print version),Journal EISSN (online version),\
Languages in which the journal accepts manuscripts,Publisher,DOAJ Seal,Journal license,APC\n\
Open Biology,2046-2441,,English,The Royal Society,Yes,CC BY,No\n\
Oncology Letters,1792-1074,1792-1082,English,Spandidos,No,CC BY-NC,Yes\n",
    )
    .expect("csv fixture should write");
    let json = temp.path().join("scimago.json");
    fs::write(
        &json,
        r#"[
            {"identifiers": ["2046-2441", "Open Biology"],
             "categories": [{"id": "Immunology", "quartile": "Q1"}],
             "areas": ["Immunology and Microbiology"]},
            {"identifiers": ["17921082"],
             "categories": [{"id": "Oncology", "quartile": "Q3"}],
             "areas": ["Medicine"]}
        ]"#,
    )
    .expect("json fixture should write");

    let journal_store = Arc::new(MemoryJournalStore::new());
    let taxonomy_store = Arc::new(MemoryTaxonomyStore::new());

    let journal_upload = JournalUploadHandler::with_store(journal_store.clone());
    let category_upload = CategoryUploadHandler::with_store(taxonomy_store.clone());
    assert_eq!(journal_upload.push_data_to_db(&csv).expect("csv upload"), 2);
    assert_eq!(category_upload.push_data_to_db(&json).expect("json upload"), 2);

    let mut engine = FullQueryEngine::new();
    assert!(engine.add_journal_handler(Arc::new(JournalQueryHandler::with_store(journal_store))));
    assert!(engine.add_category_handler(Arc::new(CategoryQueryHandler::with_store(taxonomy_store))));

    match engine.get_entity_by_id("1792-1082") {
        Some(Entity::Journal(journal)) => {
            assert_eq!(journal.title(), "Oncology Letters");
            assert_eq!(ids(journal.categories()), vec!["Oncology"]);
        }
        other => panic!("expected journal, got {other:?}"),
    }

    let open_access = engine.get_journals_in_areas_with_license(["medicine"], ["cc by nc"]);
    assert_eq!(ids(&open_access), vec!["1792-1082"]);
    let diamonds = engine.get_diamond_journals_in_areas_and_categories_with_quartile(
        NONE,
        NONE,
        ["q1"],
    );
    assert_eq!(ids(&diamonds), vec!["2046-2441"]);
}

#[test]
fn file_backed_handlers_round_trip() {
    let temp = TempDirGuard::new("files");
    let journals_path = temp.path().join("journals.jsonl");
    let taxonomy_path = temp.path().join("taxonomy.json");

    let mut upload = CategoryUploadHandler::new();
    upload
        .set_db_path_or_url(taxonomy_path.to_str().expect("utf-8 temp path"))
        .expect("path accepted");
    let scimago = temp.path().join("scimago.json");
    fs::write(
        &scimago,
        r#"[{"identifiers": ["J1"], "categories": [{"id": "Oncology", "quartile": "Q1"}], "areas": ["Medicine"]}]"#,
    )
    .expect("fixture should write");
    upload.push_data_to_db(&scimago).expect("upload succeeds");

    let journal_store = bibmesh_store::JsonlJournalStore::new(&journals_path);
    journal_store
        .ingest(vec![JournalRow::with_id("J1")])
        .expect("journal ingest succeeds");

    let mut journal_handler = JournalQueryHandler::new();
    journal_handler
        .set_db_path_or_url(journals_path.to_str().expect("utf-8 temp path"))
        .expect("path accepted");
    let mut category_handler = CategoryQueryHandler::new();
    category_handler
        .set_db_path_or_url(taxonomy_path.to_str().expect("utf-8 temp path"))
        .expect("path accepted");

    let mut engine = BasicQueryEngine::new();
    assert!(engine.add_journal_handler(Arc::new(journal_handler)));
    assert!(engine.add_category_handler(Arc::new(category_handler)));

    let journals = engine.get_all_journals();
    assert_eq!(ids(journals[0].areas()), vec!["Medicine"]);
    assert!(matches!(
        engine.get_entity_by_id("medicine"),
        Some(Entity::Area(_))
    ));
}
