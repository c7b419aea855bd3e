use crate::cli::StoreArgs;
use crate::config::ResolvedStores;
use bibmesh_core::{Area, Category, Entity, Identifiable, Journal};
use bibmesh_engine::{CategoryQueryHandler, FullQueryEngine, JournalQueryHandler};
use serde_json::{Value, json};
use std::process;
use std::sync::Arc;

/// Install the stderr subscriber. `BIBMESH_LOG` takes `EnvFilter` syntax.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("BIBMESH_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn resolve_stores_or_exit(args: &StoreArgs) -> ResolvedStores {
    ResolvedStores::resolve(args).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    })
}

/// Engine with one handler per configured store.
pub fn build_engine_or_exit(args: &StoreArgs) -> FullQueryEngine {
    let stores = resolve_stores_or_exit(args);
    let mut engine = FullQueryEngine::new();

    for location in &stores.journals {
        let mut handler = JournalQueryHandler::new();
        if let Err(e) = handler.set_db_path_or_url(location) {
            eprintln!("error: invalid journal store `{location}`: {e}");
            process::exit(1);
        }
        engine.add_journal_handler(Arc::new(handler));
    }
    for location in &stores.taxonomy {
        let mut handler = CategoryQueryHandler::new();
        if let Err(e) = handler.set_db_path_or_url(location) {
            eprintln!("error: invalid taxonomy store `{location}`: {e}");
            process::exit(1);
        }
        engine.add_category_handler(Arc::new(handler));
    }

    tracing::debug!(
        journal_stores = engine.journal_handlers().len(),
        taxonomy_stores = engine.category_handlers().len(),
        "engine ready"
    );
    engine
}

pub fn journal_json(journal: &Journal) -> Value {
    json!({
        "id": journal.id(),
        "title": journal.title(),
        "printIssn": journal.print_issn(),
        "electronicIssn": journal.electronic_issn(),
        "publisher": journal.publisher(),
        "languages": journal.languages(),
        "license": journal.license(),
        "apc": journal.has_apc(),
        "doajSeal": journal.has_doaj_seal(),
        "categories": bibmesh_engine::ids(journal.categories()),
        "areas": bibmesh_engine::ids(journal.areas()),
    })
}

pub fn category_json(category: &Category) -> Value {
    json!({
        "id": category.id(),
        "quartiles": category.quartiles(),
        "areas": category.area_ids(),
    })
}

pub fn area_json(area: &Area) -> Value {
    json!({
        "id": area.id(),
        "categories": area.category_ids(),
    })
}

pub fn entity_json(entity: &Entity) -> Value {
    let body = match entity {
        Entity::Journal(journal) => journal_json(journal),
        Entity::Category(category) => category_json(category),
        Entity::Area(area) => area_json(area),
    };
    json!({
        "type": entity.kind().as_str(),
        "entity": body,
    })
}

pub fn print_json(value: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization")
    );
}

pub fn print_journals(label: &str, journals: &[Journal], json_output: bool) {
    if json_output {
        let items: Vec<Value> = journals.iter().map(journal_json).collect();
        print_json(&json!({
            "query": label,
            "count": journals.len(),
            "items": items,
        }));
        return;
    }

    println!("bibmesh {label}");
    println!("  journals: {}", journals.len());
    for journal in journals {
        println!("  - {} ({})", journal.id(), display_or_dash(journal.title()));
        if journal.has_categories() {
            println!(
                "      categories: {}",
                bibmesh_engine::ids(journal.categories()).join(", ")
            );
        }
        if journal.has_areas() {
            println!(
                "      areas: {}",
                bibmesh_engine::ids(journal.areas()).join(", ")
            );
        }
    }
}

pub fn print_categories(label: &str, categories: &[Category], json_output: bool) {
    if json_output {
        let items: Vec<Value> = categories.iter().map(category_json).collect();
        print_json(&json!({
            "query": label,
            "count": categories.len(),
            "items": items,
        }));
        return;
    }

    println!("bibmesh {label}");
    println!("  categories: {}", categories.len());
    for category in categories {
        let quartiles = if category.has_quartiles() {
            category.quartiles().join(", ")
        } else {
            "-".to_string()
        };
        println!("  - {} [{quartiles}]", category.id());
        if category.has_areas() {
            println!("      areas: {}", category.area_ids().join(", "));
        }
    }
}

pub fn print_areas(label: &str, areas: &[Area], json_output: bool) {
    if json_output {
        let items: Vec<Value> = areas.iter().map(area_json).collect();
        print_json(&json!({
            "query": label,
            "count": areas.len(),
            "items": items,
        }));
        return;
    }

    println!("bibmesh {label}");
    println!("  areas: {}", areas.len());
    for area in areas {
        println!("  - {}", area.id());
        if area.has_categories() {
            println!("      categories: {}", area.category_ids().join(", "));
        }
    }
}

pub fn display_or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
