//! Upload handlers: ingest a source file into the configured store.

use crate::error::{ConfigError, UploadError};
use crate::handler::StoreLocation;
use bibmesh_store::{
    JournalStore, JsonTaxonomyStore, JsonlJournalStore, TaxonomyStore, read_journal_csv,
    read_taxonomy_json,
};
use std::path::Path;
use std::sync::Arc;

/// Loads a DOAJ CSV export into a journal store.
#[derive(Default)]
pub struct JournalUploadHandler {
    location: Option<StoreLocation>,
    store: Option<Arc<dyn JournalStore>>,
}

impl JournalUploadHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<dyn JournalStore>) -> Self {
        Self {
            location: None,
            store: Some(store),
        }
    }

    pub fn set_db_path_or_url(&mut self, path_or_url: &str) -> Result<(), ConfigError> {
        let location = StoreLocation::parse(path_or_url)?;
        self.store = Some(Arc::new(JsonlJournalStore::new(location.path())));
        self.location = Some(location);
        Ok(())
    }

    pub fn db_path_or_url(&self) -> Option<&str> {
        self.location.as_ref().map(StoreLocation::as_str)
    }

    /// Parse `path` and upsert every journal. Returns the number ingested.
    pub fn push_data_to_db(&self, path: impl AsRef<Path>) -> Result<usize, UploadError> {
        let store = self.store.as_ref().ok_or(UploadError::Unconfigured)?;
        let path = existing_file(path.as_ref())?;
        let rows = read_journal_csv(path)?;
        let ingested = store.ingest(rows)?;
        tracing::info!(source = %path.display(), ingested, "journals uploaded");
        Ok(ingested)
    }
}

/// Loads a Scimago JSON export into a taxonomy store.
#[derive(Default)]
pub struct CategoryUploadHandler {
    location: Option<StoreLocation>,
    store: Option<Arc<dyn TaxonomyStore>>,
}

impl CategoryUploadHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<dyn TaxonomyStore>) -> Self {
        Self {
            location: None,
            store: Some(store),
        }
    }

    pub fn set_db_path_or_url(&mut self, path_or_url: &str) -> Result<(), ConfigError> {
        let location = StoreLocation::parse(path_or_url)?;
        self.store = Some(Arc::new(JsonTaxonomyStore::new(location.path())));
        self.location = Some(location);
        Ok(())
    }

    pub fn db_path_or_url(&self) -> Option<&str> {
        self.location.as_ref().map(StoreLocation::as_str)
    }

    /// Parse `path` and insert every ranked journal. Returns the number ingested.
    pub fn push_data_to_db(&self, path: impl AsRef<Path>) -> Result<usize, UploadError> {
        let store = self.store.as_ref().ok_or(UploadError::Unconfigured)?;
        let path = existing_file(path.as_ref())?;
        let entries = read_taxonomy_json(path)?;
        let ingested = store.ingest(entries)?;
        tracing::info!(source = %path.display(), ingested, "taxonomy uploaded");
        Ok(ingested)
    }
}

fn existing_file(path: &Path) -> Result<&Path, UploadError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(UploadError::MissingInput(path.display().to_string()))
    }
}
