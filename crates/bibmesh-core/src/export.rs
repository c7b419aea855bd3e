//! Taxonomy export: the bulk exchange shape produced by taxonomy stores.
//!
//! ```text
//! categories          id -> { quartiles, areas }
//! areas               id -> { categories }
//! journal_categories  canonical journal id -> { category id -> quartiles }
//! journal_areas       canonical journal id -> { area ids }
//! journal_alias       normalized alias -> canonical journal id
//! ```
//!
//! Exports from several stores combine with [`TaxonomyExport::merge`]:
//! set union per field, and the first-seen mapping for colliding aliases.

use crate::identifier::{normalize, strip_hyphens};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryExport {
    #[serde(default)]
    pub quartiles: BTreeSet<String>,
    #[serde(default)]
    pub areas: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaExport {
    #[serde(default)]
    pub categories: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyExport {
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryExport>,
    #[serde(default)]
    pub areas: BTreeMap<String, AreaExport>,
    #[serde(default)]
    pub journal_categories: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
    #[serde(default)]
    pub journal_areas: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub journal_alias: BTreeMap<String, String>,
}

impl TaxonomyExport {
    /// Fold `other` into `self`.
    pub fn merge(&mut self, other: TaxonomyExport) {
        for (id, data) in other.categories {
            let record = self.categories.entry(id).or_default();
            record.quartiles.extend(data.quartiles);
            record.areas.extend(data.areas);
        }

        for (id, data) in other.areas {
            self.areas
                .entry(id)
                .or_default()
                .categories
                .extend(data.categories);
        }

        for (journal_id, links) in other.journal_categories {
            let record = self.journal_categories.entry(journal_id).or_default();
            for (category_id, quartiles) in links {
                record.entry(category_id).or_default().extend(quartiles);
            }
        }

        for (journal_id, areas) in other.journal_areas {
            self.journal_areas
                .entry(journal_id)
                .or_default()
                .extend(areas);
        }

        for (alias, canonical) in other.journal_alias {
            self.journal_alias.entry(alias).or_insert(canonical);
        }
    }

    /// Merge a sequence of exports in order; earlier exports win alias collisions.
    pub fn merge_all(exports: impl IntoIterator<Item = TaxonomyExport>) -> Self {
        let mut combined = Self::default();
        for export in exports {
            combined.merge(export);
        }
        combined
    }

    /// Canonical journal id for one alias, trying the normalized and the
    /// hyphen-stripped spellings.
    pub fn resolve_alias(&self, identifier: &str) -> Option<&str> {
        let direct = normalize(identifier);
        if let Some(canonical) = self.journal_alias.get(&direct) {
            return Some(canonical);
        }
        let stripped = normalize(&strip_hyphens(identifier));
        self.journal_alias.get(&stripped).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.areas.is_empty()
            && self.journal_categories.is_empty()
            && self.journal_areas.is_empty()
            && self.journal_alias.is_empty()
    }
}
