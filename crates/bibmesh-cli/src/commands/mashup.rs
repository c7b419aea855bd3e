use crate::cli::{MashupCommands, StoreArgs};
use crate::support::{build_engine_or_exit, print_journals};

pub fn run(stores: &StoreArgs, query: MashupCommands) {
    let engine = build_engine_or_exit(stores);

    match query {
        MashupCommands::InCategories {
            categories,
            quartiles,
            json,
        } => {
            let journals = engine.get_journals_in_categories_with_quartile(&categories, &quartiles);
            print_journals("mashup in-categories", &journals, json);
        }
        MashupCommands::InAreas {
            areas,
            licenses,
            json,
        } => {
            let journals = engine.get_journals_in_areas_with_license(&areas, &licenses);
            print_journals("mashup in-areas", &journals, json);
        }
        MashupCommands::Diamond {
            areas,
            categories,
            quartiles,
            json,
        } => {
            let journals = engine.get_diamond_journals_in_areas_and_categories_with_quartile(
                &areas,
                &categories,
                &quartiles,
            );
            print_journals("mashup diamond", &journals, json);
        }
    }
}
