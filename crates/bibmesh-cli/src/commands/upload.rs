use crate::cli::{StoreArgs, UploadCommands};
use crate::config::ResolvedStores;
use crate::support::{print_json, resolve_stores_or_exit};
use bibmesh_engine::{CategoryUploadHandler, ConfigError, JournalUploadHandler, UploadError};
use serde_json::json;
use std::process;

pub fn run(stores: &StoreArgs, target: UploadCommands) {
    match target {
        UploadCommands::Journals { file, store, json } => {
            let location = target_store(stores, store, |resolved| resolved.journals.first());
            let mut handler = JournalUploadHandler::new();
            configure_or_exit(handler.set_db_path_or_url(&location), &location);
            let ingested = handler.push_data_to_db(&file);
            report("journals", &file, &location, ingested, json);
        }
        UploadCommands::Categories { file, store, json } => {
            let location = target_store(stores, store, |resolved| resolved.taxonomy.first());
            let mut handler = CategoryUploadHandler::new();
            configure_or_exit(handler.set_db_path_or_url(&location), &location);
            let ingested = handler.push_data_to_db(&file);
            report("categories", &file, &location, ingested, json);
        }
    }
}

fn target_store(
    stores: &StoreArgs,
    explicit: Option<String>,
    first: impl Fn(&ResolvedStores) -> Option<&String>,
) -> String {
    if let Some(store) = explicit {
        return store;
    }
    let resolved = resolve_stores_or_exit(stores);
    first(&resolved).cloned().unwrap_or_else(|| {
        eprintln!("error: no target store; pass --store or configure one");
        process::exit(1);
    })
}

fn configure_or_exit(result: Result<(), ConfigError>, location: &str) {
    if let Err(e) = result {
        eprintln!("error: invalid store `{location}`: {e}");
        process::exit(1);
    }
}

fn report(
    kind: &str,
    file: &str,
    location: &str,
    ingested: Result<usize, UploadError>,
    json: bool,
) {
    let ingested = ingested.unwrap_or_else(|e| {
        eprintln!("error: failed to upload {file}: {e}");
        process::exit(1);
    });

    if json {
        print_json(&json!({
            "action": "upload",
            "kind": kind,
            "source": file,
            "store": location,
            "ingested": ingested,
        }));
    } else {
        println!("bibmesh upload {kind}");
        println!("  source: {file}");
        println!("  store: {location}");
        println!("  ingested: {ingested}");
    }
}
