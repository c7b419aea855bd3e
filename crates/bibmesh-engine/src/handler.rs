//! Query handlers: thin typed wrappers over one configured store each.
//!
//! A handler without a store answers every query with an empty result.
//! Handlers are configured once, then shared with an engine as `Arc`s.

use crate::error::ConfigError;
use bibmesh_core::{AreaRow, CategoryRow, JournalRow, TaxonomyEntityRow, TaxonomyExport};
use bibmesh_store::{
    JournalStore, JsonTaxonomyStore, JsonlJournalStore, StoreError, TaxonomyStore,
};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A validated local store location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation(String);

impl StoreLocation {
    /// Trim and validate a path. Empty and `http(s)://` locations are rejected.
    pub fn parse(path_or_url: &str) -> Result<Self, ConfigError> {
        let location = path_or_url.trim();
        if location.is_empty() {
            return Err(ConfigError::Empty);
        }
        let lowered = location.to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            return Err(ConfigError::Remote(location.to_string()));
        }
        Ok(Self(location.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of journal fetches every journal handler answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalFetch<'a> {
    All,
    ById(&'a str),
    ByTitle(&'a str),
    ByPublisher(&'a str),
    ByLicense(&'a [String]),
    WithApc,
    WithDoajSeal,
}

impl JournalFetch<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            JournalFetch::All => "all",
            JournalFetch::ById(_) => "by_id",
            JournalFetch::ByTitle(_) => "by_title",
            JournalFetch::ByPublisher(_) => "by_publisher",
            JournalFetch::ByLicense(_) => "by_license",
            JournalFetch::WithApc => "with_apc",
            JournalFetch::WithDoajSeal => "with_doaj_seal",
        }
    }
}

#[derive(Default)]
pub struct JournalQueryHandler {
    location: Option<StoreLocation>,
    store: Option<Arc<dyn JournalStore>>,
}

impl JournalQueryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler over an existing store handle.
    pub fn with_store(store: Arc<dyn JournalStore>) -> Self {
        Self {
            location: None,
            store: Some(store),
        }
    }

    /// Point the handler at a JSONL journal file.
    ///
    /// On error the previous configuration is kept.
    pub fn set_db_path_or_url(&mut self, path_or_url: &str) -> Result<(), ConfigError> {
        let location = StoreLocation::parse(path_or_url)?;
        self.store = Some(Arc::new(JsonlJournalStore::new(location.path())));
        self.location = Some(location);
        Ok(())
    }

    pub fn db_path_or_url(&self) -> Option<&str> {
        self.location.as_ref().map(StoreLocation::as_str)
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// Run one fetch against the configured store.
    pub fn fetch(&self, request: JournalFetch<'_>) -> Result<Vec<JournalRow>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(Vec::new());
        };
        match request {
            JournalFetch::All => store.fetch_all(),
            JournalFetch::ById(identifier) => store.fetch_by_id(identifier),
            JournalFetch::ByTitle(title_part) => store.fetch_by_title(title_part),
            JournalFetch::ByPublisher(publisher_part) => store.fetch_by_publisher(publisher_part),
            JournalFetch::ByLicense(licenses) => store.fetch_by_license(licenses),
            JournalFetch::WithApc => store.fetch_with_apc(),
            JournalFetch::WithDoajSeal => store.fetch_with_doaj_seal(),
        }
    }

    pub fn get_by_id(&self, identifier: &str) -> Result<Vec<JournalRow>, StoreError> {
        self.fetch(JournalFetch::ById(identifier))
    }

    pub fn get_all_journals(&self) -> Result<Vec<JournalRow>, StoreError> {
        self.fetch(JournalFetch::All)
    }

    pub fn get_journals_with_title(&self, title_part: &str) -> Result<Vec<JournalRow>, StoreError> {
        self.fetch(JournalFetch::ByTitle(title_part))
    }

    pub fn get_journals_published_by(
        &self,
        publisher_part: &str,
    ) -> Result<Vec<JournalRow>, StoreError> {
        self.fetch(JournalFetch::ByPublisher(publisher_part))
    }

    pub fn get_journals_with_license(
        &self,
        licenses: &[String],
    ) -> Result<Vec<JournalRow>, StoreError> {
        self.fetch(JournalFetch::ByLicense(licenses))
    }

    pub fn get_journals_with_apc(&self) -> Result<Vec<JournalRow>, StoreError> {
        self.fetch(JournalFetch::WithApc)
    }

    pub fn get_journals_with_doaj_seal(&self) -> Result<Vec<JournalRow>, StoreError> {
        self.fetch(JournalFetch::WithDoajSeal)
    }
}

impl fmt::Debug for JournalQueryHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JournalQueryHandler")
            .field("location", &self.db_path_or_url())
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[derive(Default)]
pub struct CategoryQueryHandler {
    location: Option<StoreLocation>,
    store: Option<Arc<dyn TaxonomyStore>>,
}

impl CategoryQueryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<dyn TaxonomyStore>) -> Self {
        Self {
            location: None,
            store: Some(store),
        }
    }

    /// Point the handler at a JSON taxonomy snapshot.
    ///
    /// On error the previous configuration is kept.
    pub fn set_db_path_or_url(&mut self, path_or_url: &str) -> Result<(), ConfigError> {
        let location = StoreLocation::parse(path_or_url)?;
        self.store = Some(Arc::new(JsonTaxonomyStore::new(location.path())));
        self.location = Some(location);
        Ok(())
    }

    pub fn db_path_or_url(&self) -> Option<&str> {
        self.location.as_ref().map(StoreLocation::as_str)
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub fn get_by_id(&self, identifier: &str) -> Result<Option<TaxonomyEntityRow>, StoreError> {
        match &self.store {
            Some(store) => store.fetch_entity_by_identifier(identifier),
            None => Ok(None),
        }
    }

    pub fn get_all_categories(&self) -> Result<Vec<CategoryRow>, StoreError> {
        match &self.store {
            Some(store) => store.fetch_categories(),
            None => Ok(Vec::new()),
        }
    }

    pub fn get_all_areas(&self) -> Result<Vec<AreaRow>, StoreError> {
        match &self.store {
            Some(store) => store.fetch_areas(),
            None => Ok(Vec::new()),
        }
    }

    pub fn get_categories_with_quartile(
        &self,
        quartiles: &[String],
    ) -> Result<Vec<CategoryRow>, StoreError> {
        match &self.store {
            Some(store) => store.fetch_categories_with_quartiles(quartiles),
            None => Ok(Vec::new()),
        }
    }

    pub fn get_categories_assigned_to_areas(
        &self,
        areas: &[String],
    ) -> Result<Vec<CategoryRow>, StoreError> {
        match &self.store {
            Some(store) => store.fetch_categories_assigned_to_areas(areas),
            None => Ok(Vec::new()),
        }
    }

    pub fn get_areas_assigned_to_categories(
        &self,
        categories: &[String],
    ) -> Result<Vec<AreaRow>, StoreError> {
        match &self.store {
            Some(store) => store.fetch_areas_assigned_to_categories(categories),
            None => Ok(Vec::new()),
        }
    }

    pub fn resolve_journal(&self, identifier: &str) -> Result<Option<String>, StoreError> {
        match &self.store {
            Some(store) => store.resolve_journal(identifier),
            None => Ok(None),
        }
    }

    /// Bulk export of the configured store; empty when unconfigured.
    pub fn export(&self) -> Result<TaxonomyExport, StoreError> {
        match &self.store {
            Some(store) => store.export_all(),
            None => Ok(TaxonomyExport::default()),
        }
    }
}

impl fmt::Debug for CategoryQueryHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryQueryHandler")
            .field("location", &self.db_path_or_url())
            .field("configured", &self.is_configured())
            .finish()
    }
}
