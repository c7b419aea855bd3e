//! Full query engine: compound predicates across the journal/taxonomy join.

use crate::basic::BasicQueryEngine;
use crate::handler::JournalFetch;
use bibmesh_core::{
    Identifiable, Journal, JournalRow, intersects_or_vacuous, normalize, normalize_set,
};
use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

/// [`BasicQueryEngine`] plus mashup queries.
///
/// Row-level pre-filters (license, APC) run before hydration so the
/// taxonomy join only sees candidate rows.
#[derive(Debug, Default)]
pub struct FullQueryEngine {
    basic: BasicQueryEngine,
}

impl FullQueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_basic(basic: BasicQueryEngine) -> Self {
        Self { basic }
    }

    pub fn into_basic(self) -> BasicQueryEngine {
        self.basic
    }

    /// Journals with at least one category that matches the requested
    /// categories and carries a requested quartile. Empty requests match all.
    pub fn get_journals_in_categories_with_quartile<C, Q, S, T>(
        &self,
        categories: C,
        quartiles: Q,
    ) -> Vec<Journal>
    where
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
        Q: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let categories = normalize_set(categories);
        let quartiles = normalize_set(quartiles);

        let mut journals = self.basic.journals(JournalFetch::All);
        journals.retain(|journal| has_ranked_category(journal, &categories, &quartiles));
        journals
    }

    /// Journals under a requested license whose areas meet the requested areas.
    pub fn get_journals_in_areas_with_license<A, L, S, T>(
        &self,
        areas: A,
        licenses: L,
    ) -> Vec<Journal>
    where
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
        L: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let areas = normalize_set(areas);
        let licenses = normalize_set(licenses);

        let mut rows = self.basic.collect_journal_rows(JournalFetch::All);
        rows.retain(|row| licenses.is_empty() || licenses.contains(&normalize(&row.license)));

        let mut journals = self.basic.hydrate(&rows);
        journals.retain(|journal| in_areas(journal, &areas));
        journals
    }

    /// APC-free journals in the requested areas with a category matching the
    /// requested categories and quartiles.
    pub fn get_diamond_journals_in_areas_and_categories_with_quartile<A, C, Q, S, T, U>(
        &self,
        areas: A,
        categories: C,
        quartiles: Q,
    ) -> Vec<Journal>
    where
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
        C: IntoIterator<Item = T>,
        T: AsRef<str>,
        Q: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        let areas = normalize_set(areas);
        let categories = normalize_set(categories);
        let quartiles = normalize_set(quartiles);

        let mut rows = self.basic.collect_journal_rows(JournalFetch::All);
        rows.retain(is_diamond);
        tracing::debug!(candidates = rows.len(), "diamond pre-filter applied");

        let mut journals = self.basic.hydrate(&rows);
        journals.retain(|journal| {
            in_areas(journal, &areas) && has_ranked_category(journal, &categories, &quartiles)
        });
        journals
    }
}

impl Deref for FullQueryEngine {
    type Target = BasicQueryEngine;

    fn deref(&self) -> &Self::Target {
        &self.basic
    }
}

impl DerefMut for FullQueryEngine {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.basic
    }
}

fn is_diamond(row: &JournalRow) -> bool {
    !row.apc
}

fn in_areas(journal: &Journal, areas: &BTreeSet<String>) -> bool {
    intersects_or_vacuous(areas, journal.areas().iter().map(Identifiable::id))
}

/// OR over the journal's categories of (category match AND quartile match).
fn has_ranked_category(
    journal: &Journal,
    categories: &BTreeSet<String>,
    quartiles: &BTreeSet<String>,
) -> bool {
    journal.categories().iter().any(|category| {
        (categories.is_empty() || categories.contains(&normalize(category.id())))
            && intersects_or_vacuous(quartiles, category.quartiles())
    })
}
