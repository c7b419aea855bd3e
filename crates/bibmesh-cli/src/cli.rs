use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bibmesh",
    about = "Bibmesh: reconcile journal records with a category/area taxonomy",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub stores: StoreArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct StoreArgs {
    /// Path to the bibmesh config file [default: bibmesh.toml, if present]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Journal store (JSONL); repeat to register several. Overrides the config file
    #[arg(long = "journals", global = true)]
    pub journals: Vec<String>,

    /// Taxonomy store (JSON); repeat to register several. Overrides the config file
    #[arg(long = "taxonomy", global = true)]
    pub taxonomy: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a source file into a store
    Upload {
        #[command(subcommand)]
        target: UploadCommands,
    },

    /// Look up a journal, category or area by any identifier
    Entity {
        /// Journal id, ISSN, title, category id or area id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List journals, optionally filtered by one predicate
    Journals {
        #[command(flatten)]
        filter: JournalFilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories
    Categories {
        /// Keep categories holding any of these quartiles (repeatable)
        #[arg(long = "quartile")]
        quartiles: Vec<String>,

        /// Keep categories assigned to any of these areas (repeatable)
        #[arg(long = "area")]
        areas: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List areas
    Areas {
        /// Keep areas assigned to any of these categories (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compound journal/taxonomy queries
    Mashup {
        #[command(subcommand)]
        query: MashupCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum UploadCommands {
    /// Ingest a DOAJ CSV export into a journal store
    Journals {
        /// DOAJ CSV file
        file: String,

        /// Target store (defaults to the first configured journal store)
        #[arg(long)]
        store: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ingest a Scimago JSON export into a taxonomy store
    Categories {
        /// Scimago JSON file
        file: String,

        /// Target store (defaults to the first configured taxonomy store)
        #[arg(long)]
        store: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// At most one journal predicate; none lists every journal.
#[derive(Args, Clone, Debug, Default)]
#[group(multiple = false)]
pub struct JournalFilterArgs {
    /// Case-insensitive title substring
    #[arg(long)]
    pub title: Option<String>,

    /// Case-insensitive publisher substring
    #[arg(long)]
    pub publisher: Option<String>,

    /// Accepted license (repeatable)
    #[arg(long = "license")]
    pub licenses: Vec<String>,

    /// Only journals charging an APC
    #[arg(long)]
    pub apc: bool,

    /// Only journals holding the DOAJ seal
    #[arg(long)]
    pub seal: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum MashupCommands {
    /// Journals with a category matching both the categories and the quartiles
    InCategories {
        #[arg(long = "category")]
        categories: Vec<String>,

        #[arg(long = "quartile")]
        quartiles: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Journals under one of the licenses, in one of the areas
    InAreas {
        #[arg(long = "area")]
        areas: Vec<String>,

        #[arg(long = "license")]
        licenses: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// APC-free journals in the areas with a matching category and quartile
    Diamond {
        #[arg(long = "area")]
        areas: Vec<String>,

        #[arg(long = "category")]
        categories: Vec<String>,

        #[arg(long = "quartile")]
        quartiles: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
