use crate::cli::StoreArgs;
use crate::support::{build_engine_or_exit, display_or_dash, entity_json, print_json, yes_no};
use bibmesh_core::{Entity, Identifiable};
use serde_json::json;

pub fn run(stores: &StoreArgs, id: String, json: bool) {
    let engine = build_engine_or_exit(stores);
    let found = engine.get_entity_by_id(&id);

    if json {
        let value = match &found {
            Some(entity) => entity_json(entity),
            None => json!({ "type": null, "entity": null }),
        };
        print_json(&value);
        return;
    }

    let Some(entity) = found else {
        println!("bibmesh entity {id}");
        println!("  not found");
        return;
    };

    println!("bibmesh entity {id}");
    println!("  type: {}", entity.kind().as_str());
    println!("  id: {}", entity.id());
    match &entity {
        Entity::Journal(journal) => {
            println!("  title: {}", display_or_dash(journal.title()));
            println!("  publisher: {}", display_or_dash(journal.publisher()));
            println!("  license: {}", display_or_dash(journal.license()));
            println!("  apc: {}", yes_no(journal.has_apc()));
            println!("  doaj seal: {}", yes_no(journal.has_doaj_seal()));
            println!(
                "  categories: {}",
                bibmesh_engine::ids(journal.categories()).join(", ")
            );
            println!("  areas: {}", bibmesh_engine::ids(journal.areas()).join(", "));
        }
        Entity::Category(category) => {
            println!("  quartiles: {}", category.quartiles().join(", "));
            println!("  areas: {}", category.area_ids().join(", "));
        }
        Entity::Area(area) => {
            println!("  categories: {}", area.category_ids().join(", "));
        }
    }
}
