//! Bibmesh CLI: the `bibmesh` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing();

    match cli.command {
        Commands::Upload { target } => commands::upload::run(&cli.stores, target),

        Commands::Entity { id, json } => commands::entity::run(&cli.stores, id, json),

        Commands::Journals { filter, json } => commands::journals::run(&cli.stores, filter, json),

        Commands::Categories {
            quartiles,
            areas,
            json,
        } => commands::categories::run(&cli.stores, quartiles, areas, json),

        Commands::Areas { categories, json } => {
            commands::areas::run(&cli.stores, categories, json)
        }

        Commands::Mashup { query } => commands::mashup::run(&cli.stores, query),
    }
}
