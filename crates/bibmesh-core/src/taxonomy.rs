//! Taxonomy arena: categories and areas with mutual links.
//!
//! Nodes live in two vectors and reference each other by index, so the
//! category <-> area cycle never becomes an ownership cycle. Every link is
//! written on both sides at once; there is no way to record one direction
//! without the other.
//!
//! Read access goes through [`Category`] and [`Area`], cheap handles that
//! pair an `Arc<Taxonomy>` with a node index.

use crate::entity::{EntityCore, Identifiable};
use crate::export::{AreaExport, CategoryExport, TaxonomyExport};
use crate::identifier::normalize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct CategoryNode {
    core: EntityCore,
    quartiles: Vec<String>,
    areas: Vec<usize>,
}

#[derive(Debug, Clone)]
struct AreaNode {
    core: EntityCore,
    categories: Vec<usize>,
}

/// Category/area graph materialized from one taxonomy export.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    categories: Vec<CategoryNode>,
    areas: Vec<AreaNode>,
    category_index: BTreeMap<String, usize>,
    area_index: BTreeMap<String, usize>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize the category/area sections of an export.
    ///
    /// Links are taken from both sides of the export, so a category listing
    /// an area and an area listing a category produce the same edge.
    pub fn from_export(export: &TaxonomyExport) -> Self {
        let mut taxonomy = Self::new();

        for (category_id, data) in &export.categories {
            taxonomy.insert_category(category_id);
            for quartile in &data.quartiles {
                taxonomy.add_quartile(category_id, quartile);
            }
            for area_id in &data.areas {
                taxonomy.add_area_to_category(category_id, area_id);
            }
        }

        for (area_id, data) in &export.areas {
            taxonomy.insert_area(area_id);
            for category_id in &data.categories {
                taxonomy.add_category_to_area(area_id, category_id);
            }
        }

        taxonomy
    }

    /// Re-export the category/area sections. Journal sections stay empty.
    pub fn to_export(&self) -> TaxonomyExport {
        let mut export = TaxonomyExport::default();

        for node in &self.categories {
            export.categories.insert(
                node.core.id().to_string(),
                CategoryExport {
                    quartiles: node.quartiles.iter().cloned().collect(),
                    areas: node
                        .areas
                        .iter()
                        .map(|&idx| self.areas[idx].core.id().to_string())
                        .collect(),
                },
            );
        }

        for node in &self.areas {
            export.areas.insert(
                node.core.id().to_string(),
                AreaExport {
                    categories: node
                        .categories
                        .iter()
                        .map(|&idx| self.categories[idx].core.id().to_string())
                        .collect(),
                },
            );
        }

        export
    }

    /// Insert a category if absent. Returns `true` when a node was created.
    ///
    /// Blank ids are ignored.
    pub fn insert_category(&mut self, id: &str) -> bool {
        let before = self.categories.len();
        self.ensure_category(id);
        self.categories.len() > before
    }

    /// Insert an area if absent. Returns `true` when a node was created.
    pub fn insert_area(&mut self, id: &str) -> bool {
        let before = self.areas.len();
        self.ensure_area(id);
        self.areas.len() > before
    }

    /// Attach a quartile label to a category, creating the category if needed.
    ///
    /// Labels are trimmed; blank and repeated labels are ignored.
    pub fn add_quartile(&mut self, category_id: &str, quartile: &str) -> bool {
        let quartile = quartile.trim();
        if quartile.is_empty() {
            return false;
        }
        let Some(idx) = self.ensure_category(category_id) else {
            return false;
        };
        let quartiles = &mut self.categories[idx].quartiles;
        if quartiles.iter().any(|existing| existing == quartile) {
            return false;
        }
        quartiles.push(quartile.to_string());
        true
    }

    /// Link `area_id` into the areas of `category_id`, and the category into
    /// the area in the same step. Missing nodes are created.
    pub fn add_area_to_category(&mut self, category_id: &str, area_id: &str) -> bool {
        match (self.ensure_category(category_id), self.ensure_area(area_id)) {
            (Some(category), Some(area)) => self.link(category, area),
            _ => false,
        }
    }

    /// Mirror of [`Taxonomy::add_area_to_category`] seen from the area side.
    pub fn add_category_to_area(&mut self, area_id: &str, category_id: &str) -> bool {
        match (self.ensure_area(area_id), self.ensure_category(category_id)) {
            (Some(area), Some(category)) => self.link(category, area),
            _ => false,
        }
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.areas.is_empty()
    }

    /// Quartiles of one category, in insertion order.
    pub fn quartiles_of(&self, category_id: &str) -> Option<&[String]> {
        self.category_index
            .get(category_id.trim())
            .map(|&idx| self.categories[idx].quartiles.as_slice())
    }

    /// Area ids linked to one category, in insertion order.
    pub fn areas_of(&self, category_id: &str) -> Vec<&str> {
        self.category_index
            .get(category_id.trim())
            .map(|&idx| {
                self.categories[idx]
                    .areas
                    .iter()
                    .map(|&area| self.areas[area].core.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Category ids linked to one area, in insertion order.
    pub fn categories_of(&self, area_id: &str) -> Vec<&str> {
        self.area_index
            .get(area_id.trim())
            .map(|&idx| {
                self.areas[idx]
                    .categories
                    .iter()
                    .map(|&category| self.categories[category].core.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Handle for a category by exact (trimmed) id.
    pub fn category(self: &Arc<Self>, id: &str) -> Option<Category> {
        self.category_index.get(id.trim()).map(|&idx| Category {
            graph: Arc::clone(self),
            idx,
        })
    }

    /// Handle for an area by exact (trimmed) id.
    pub fn area(self: &Arc<Self>, id: &str) -> Option<Area> {
        self.area_index.get(id.trim()).map(|&idx| Area {
            graph: Arc::clone(self),
            idx,
        })
    }

    /// All categories in materialization order.
    pub fn categories(self: &Arc<Self>) -> Vec<Category> {
        (0..self.categories.len())
            .map(|idx| Category {
                graph: Arc::clone(self),
                idx,
            })
            .collect()
    }

    /// All areas in materialization order.
    pub fn areas(self: &Arc<Self>) -> Vec<Area> {
        (0..self.areas.len())
            .map(|idx| Area {
                graph: Arc::clone(self),
                idx,
            })
            .collect()
    }

    /// First category whose normalized id equals the normalized `identifier`.
    pub fn find_category(self: &Arc<Self>, identifier: &str) -> Option<Category> {
        let key = normalize(identifier);
        self.categories
            .iter()
            .position(|node| normalize(node.core.id()) == key)
            .map(|idx| Category {
                graph: Arc::clone(self),
                idx,
            })
    }

    /// First area whose normalized id equals the normalized `identifier`.
    pub fn find_area(self: &Arc<Self>, identifier: &str) -> Option<Area> {
        let key = normalize(identifier);
        self.areas
            .iter()
            .position(|node| normalize(node.core.id()) == key)
            .map(|idx| Area {
                graph: Arc::clone(self),
                idx,
            })
    }

    fn ensure_category(&mut self, id: &str) -> Option<usize> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        if let Some(&idx) = self.category_index.get(id) {
            return Some(idx);
        }
        let idx = self.categories.len();
        self.categories.push(CategoryNode {
            core: EntityCore::new(id, id),
            quartiles: Vec::new(),
            areas: Vec::new(),
        });
        self.category_index.insert(id.to_string(), idx);
        Some(idx)
    }

    fn ensure_area(&mut self, id: &str) -> Option<usize> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        if let Some(&idx) = self.area_index.get(id) {
            return Some(idx);
        }
        let idx = self.areas.len();
        self.areas.push(AreaNode {
            core: EntityCore::new(id, id),
            categories: Vec::new(),
        });
        self.area_index.insert(id.to_string(), idx);
        Some(idx)
    }

    fn link(&mut self, category: usize, area: usize) -> bool {
        let mut changed = false;
        if !self.categories[category].areas.contains(&area) {
            self.categories[category].areas.push(area);
            changed = true;
        }
        if !self.areas[area].categories.contains(&category) {
            self.areas[area].categories.push(category);
            changed = true;
        }
        changed
    }
}

/// Shared handle to one category node.
#[derive(Clone)]
pub struct Category {
    graph: Arc<Taxonomy>,
    idx: usize,
}

impl Category {
    fn node(&self) -> &CategoryNode {
        &self.graph.categories[self.idx]
    }

    pub fn quartiles(&self) -> &[String] {
        &self.node().quartiles
    }

    pub fn has_quartiles(&self) -> bool {
        !self.node().quartiles.is_empty()
    }

    pub fn areas(&self) -> Vec<Area> {
        self.node()
            .areas
            .iter()
            .map(|&idx| Area {
                graph: Arc::clone(&self.graph),
                idx,
            })
            .collect()
    }

    pub fn area_ids(&self) -> Vec<&str> {
        self.node()
            .areas
            .iter()
            .map(|&idx| self.graph.areas[idx].core.id())
            .collect()
    }

    pub fn has_areas(&self) -> bool {
        !self.node().areas.is_empty()
    }
}

impl Identifiable for Category {
    fn id(&self) -> &str {
        self.node().core.id()
    }

    fn name(&self) -> &str {
        self.node().core.name()
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Category {}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Category")
            .field("id", &self.id())
            .field("quartiles", &self.quartiles())
            .field("areas", &self.area_ids())
            .finish()
    }
}

/// Shared handle to one area node.
#[derive(Clone)]
pub struct Area {
    graph: Arc<Taxonomy>,
    idx: usize,
}

impl Area {
    fn node(&self) -> &AreaNode {
        &self.graph.areas[self.idx]
    }

    pub fn categories(&self) -> Vec<Category> {
        self.node()
            .categories
            .iter()
            .map(|&idx| Category {
                graph: Arc::clone(&self.graph),
                idx,
            })
            .collect()
    }

    pub fn category_ids(&self) -> Vec<&str> {
        self.node()
            .categories
            .iter()
            .map(|&idx| self.graph.categories[idx].core.id())
            .collect()
    }

    pub fn has_categories(&self) -> bool {
        !self.node().categories.is_empty()
    }
}

impl Identifiable for Area {
    fn id(&self) -> &str {
        self.node().core.id()
    }

    fn name(&self) -> &str {
        self.node().core.name()
    }
}

impl PartialEq for Area {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Area {}

impl fmt::Debug for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Area")
            .field("id", &self.id())
            .field("categories", &self.category_ids())
            .finish()
    }
}
