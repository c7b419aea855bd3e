use crate::cli::StoreArgs;
use crate::support::{build_engine_or_exit, print_categories};
use bibmesh_core::Identifiable;
use std::collections::BTreeSet;

/// Both filters apply when both are given.
pub fn run(stores: &StoreArgs, quartiles: Vec<String>, areas: Vec<String>, json: bool) {
    let engine = build_engine_or_exit(stores);

    let mut categories = engine.get_categories_with_quartile(&quartiles);
    if !areas.is_empty() {
        let in_areas: BTreeSet<String> = engine
            .get_categories_assigned_to_areas(&areas)
            .iter()
            .map(|category| category.id().to_string())
            .collect();
        categories.retain(|category| in_areas.contains(category.id()));
    }

    print_categories("categories", &categories, json);
}
