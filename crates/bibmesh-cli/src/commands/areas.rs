use crate::cli::StoreArgs;
use crate::support::{build_engine_or_exit, print_areas};

pub fn run(stores: &StoreArgs, categories: Vec<String>, json: bool) {
    let engine = build_engine_or_exit(stores);
    let areas = engine.get_areas_assigned_to_categories(&categories);
    print_areas("areas", &areas, json);
}
