//! Journal: the bibliographic side of the graph.

use crate::entity::{EntityCore, Identifiable};
use crate::row::JournalRow;
use crate::taxonomy::{Area, Category};

/// A journal with its taxonomy links.
///
/// Links point one way: the journal knows its categories and areas, the
/// taxonomy nodes know nothing about journals. Link lists are keyed by node
/// id, so attaching the same node twice is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    core: EntityCore,
    title: String,
    print_issn: String,
    electronic_issn: String,
    publisher: String,
    languages: Vec<String>,
    license: String,
    has_apc: bool,
    has_doaj_seal: bool,
    categories: Vec<Category>,
    areas: Vec<Area>,
}

impl Journal {
    /// Journal with an id and a title; the title doubles as display name.
    pub fn new(id: impl AsRef<str>, title: impl AsRef<str>) -> Self {
        Self {
            core: EntityCore::new(&id, &title),
            title: title.as_ref().trim().to_string(),
            ..Self::default()
        }
    }

    /// Build the unlinked journal object for one store row.
    pub fn from_row(row: &JournalRow) -> Self {
        Self::new(&row.id, &row.title)
            .with_print_issn(&row.print_issn)
            .with_electronic_issn(&row.electronic_issn)
            .with_publisher(&row.publisher)
            .with_languages(&row.languages)
            .with_license(&row.license)
            .with_apc(row.apc)
            .with_doaj_seal(row.doaj_seal)
    }

    pub fn with_print_issn(mut self, issn: impl AsRef<str>) -> Self {
        self.print_issn = issn.as_ref().trim().to_string();
        self
    }

    pub fn with_electronic_issn(mut self, issn: impl AsRef<str>) -> Self {
        self.electronic_issn = issn.as_ref().trim().to_string();
        self
    }

    pub fn with_publisher(mut self, publisher: impl AsRef<str>) -> Self {
        self.publisher = publisher.as_ref().trim().to_string();
        self
    }

    /// Languages are trimmed; blanks and repeats are dropped, order is kept.
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.languages.clear();
        for language in languages {
            let language = language.as_ref().trim();
            if !language.is_empty() && !self.languages.iter().any(|l| l == language) {
                self.languages.push(language.to_string());
            }
        }
        self
    }

    pub fn with_license(mut self, license: impl AsRef<str>) -> Self {
        self.license = license.as_ref().trim().to_string();
        self
    }

    pub fn with_apc(mut self, has_apc: bool) -> Self {
        self.has_apc = has_apc;
        self
    }

    pub fn with_doaj_seal(mut self, has_doaj_seal: bool) -> Self {
        self.has_doaj_seal = has_doaj_seal;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    pub fn print_issn(&self) -> &str {
        &self.print_issn
    }

    pub fn has_print_issn(&self) -> bool {
        !self.print_issn.is_empty()
    }

    pub fn electronic_issn(&self) -> &str {
        &self.electronic_issn
    }

    pub fn has_electronic_issn(&self) -> bool {
        !self.electronic_issn.is_empty()
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn has_publisher(&self) -> bool {
        !self.publisher.is_empty()
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn has_languages(&self) -> bool {
        !self.languages.is_empty()
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn has_license(&self) -> bool {
        !self.license.is_empty()
    }

    pub fn has_apc(&self) -> bool {
        self.has_apc
    }

    pub fn has_doaj_seal(&self) -> bool {
        self.has_doaj_seal
    }

    /// Every identifier the journal answers to: id, ISSNs and title.
    pub fn all_identifiers(&self) -> Vec<&str> {
        let mut identifiers: Vec<&str> = Vec::new();
        for identifier in [
            self.core.id(),
            self.print_issn.as_str(),
            self.electronic_issn.as_str(),
            self.title.as_str(),
        ] {
            if !identifier.is_empty() && !identifiers.contains(&identifier) {
                identifiers.push(identifier);
            }
        }
        identifiers
    }

    /// Attach a category. Returns `false` for a blank or already-linked id.
    pub fn add_category(&mut self, category: Category) -> bool {
        if !category.has_id() || self.categories.iter().any(|c| c.id() == category.id()) {
            return false;
        }
        self.categories.push(category);
        true
    }

    /// Attach an area. Returns `false` for a blank or already-linked id.
    pub fn add_area(&mut self, area: Area) -> bool {
        if !area.has_id() || self.areas.iter().any(|a| a.id() == area.id()) {
            return false;
        }
        self.areas.push(area);
        true
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn has_categories(&self) -> bool {
        !self.categories.is_empty()
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn has_areas(&self) -> bool {
        !self.areas.is_empty()
    }
}

impl Identifiable for Journal {
    fn id(&self) -> &str {
        self.core.id()
    }

    fn name(&self) -> &str {
        self.core.name()
    }
}
