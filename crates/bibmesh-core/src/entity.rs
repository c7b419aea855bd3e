//! Identifiable entities: the shared id/name surface of journals and taxonomy nodes.

use crate::journal::Journal;
use crate::row::EntityKind;
use crate::taxonomy::{Area, Category};

/// Anything addressable by an identifier and carrying a display name.
///
/// Both values are whitespace-trimmed. An empty string is a valid state,
/// distinguished from a populated one by `has_id` / `has_name`.
pub trait Identifiable {
    fn id(&self) -> &str;
    fn name(&self) -> &str;

    fn has_id(&self) -> bool {
        !self.id().is_empty()
    }

    fn has_name(&self) -> bool {
        !self.name().is_empty()
    }
}

/// Owned id/name pair that keeps the trimming invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCore {
    id: String,
    name: String,
}

impl EntityCore {
    pub fn new(id: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self {
            id: id.as_ref().trim().to_string(),
            name: name.as_ref().trim().to_string(),
        }
    }

    pub fn set_id(&mut self, id: impl AsRef<str>) {
        self.id = id.as_ref().trim().to_string();
    }

    pub fn set_name(&mut self, name: impl AsRef<str>) {
        self.name = name.as_ref().trim().to_string();
    }
}

impl Identifiable for EntityCore {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Any entity the engine can resolve from a bare identifier.
#[derive(Debug, Clone)]
pub enum Entity {
    Journal(Journal),
    Category(Category),
    Area(Area),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Journal(_) => EntityKind::Journal,
            Entity::Category(_) => EntityKind::Category,
            Entity::Area(_) => EntityKind::Area,
        }
    }

    pub fn as_journal(&self) -> Option<&Journal> {
        match self {
            Entity::Journal(journal) => Some(journal),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<&Category> {
        match self {
            Entity::Category(category) => Some(category),
            _ => None,
        }
    }

    pub fn as_area(&self) -> Option<&Area> {
        match self {
            Entity::Area(area) => Some(area),
            _ => None,
        }
    }
}

impl Identifiable for Entity {
    fn id(&self) -> &str {
        match self {
            Entity::Journal(journal) => journal.id(),
            Entity::Category(category) => category.id(),
            Entity::Area(area) => area.id(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Entity::Journal(journal) => journal.name(),
            Entity::Category(category) => category.name(),
            Entity::Area(area) => area.name(),
        }
    }
}
