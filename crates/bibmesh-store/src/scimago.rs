//! Scimago JSON ingestion: journal rankings -> taxonomy entries.
//!
//! ```text
//! [
//!   { "identifiers": ["1520-6149", "Signal Processing"],
//!     "categories": [{ "id": "Signal Processing", "quartile": "Q1" }],
//!     "areas": ["Engineering"] }
//! ]
//! ```

use crate::error::StoreError;
use crate::persist::read_text;
use serde_json::Value;
use std::path::Path;

/// One category assignment of a ranked journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAssignment {
    pub id: String,
    pub quartile: Option<String>,
}

/// One ranked journal with its taxonomy links, values trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyEntry {
    pub identifiers: Vec<String>,
    pub categories: Vec<CategoryAssignment>,
    pub areas: Vec<String>,
}

impl TaxonomyEntry {
    /// First identifier; the canonical journal id.
    pub fn canonical_id(&self) -> Option<&str> {
        self.identifiers.first().map(String::as_str)
    }
}

/// Read a Scimago JSON file into taxonomy entries.
pub fn read_taxonomy_json(path: impl AsRef<Path>) -> Result<Vec<TaxonomyEntry>, StoreError> {
    let path = path.as_ref();
    let text = read_text(path)?
        .ok_or_else(|| StoreError::Io(0, format!("{}: file not found", path.display())))?;
    parse_taxonomy_json(text.as_bytes()).map_err(|e| e.in_file(path))
}

/// Parse Scimago JSON content.
///
/// The payload must be a list of objects. Scalar identifiers are accepted
/// as strings, numbers or booleans; blank values and categories without an
/// id are dropped.
pub fn parse_taxonomy_json(bytes: &[u8]) -> Result<Vec<TaxonomyEntry>, StoreError> {
    let payload: Value =
        serde_json::from_slice(bytes).map_err(|e| StoreError::Parse(e.line(), e.to_string()))?;
    let Value::Array(items) = payload else {
        return Err(StoreError::Malformed(format!(
            "taxonomy payload must be a list, found {}",
            kind_of(&payload)
        )));
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            return Err(StoreError::Malformed(format!(
                "taxonomy entry {index} must be an object, found {}",
                kind_of(item)
            )));
        };

        let identifiers = scalar_list(fields.get("identifiers"), index, "identifiers")?;
        let areas = scalar_list(fields.get("areas"), index, "areas")?;

        let mut categories = Vec::new();
        for assignment in list(fields.get("categories"), index, "categories")? {
            let Value::Object(assignment) = assignment else {
                return Err(StoreError::Malformed(format!(
                    "taxonomy entry {index}: category must be an object, found {}",
                    kind_of(assignment)
                )));
            };
            let id = scalar(assignment.get("id"));
            if id.is_empty() {
                continue;
            }
            let quartile = Some(scalar(assignment.get("quartile"))).filter(|q| !q.is_empty());
            categories.push(CategoryAssignment { id, quartile });
        }

        entries.push(TaxonomyEntry {
            identifiers,
            categories,
            areas,
        });
    }

    tracing::debug!(entries = entries.len(), "parsed Scimago JSON");
    Ok(entries)
}

fn list<'a>(value: Option<&'a Value>, index: usize, field: &str) -> Result<&'a [Value], StoreError> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(StoreError::Malformed(format!(
            "taxonomy entry {index}: `{field}` must be a list, found {}",
            kind_of(other)
        ))),
    }
}

fn scalar_list(value: Option<&Value>, index: usize, field: &str) -> Result<Vec<String>, StoreError> {
    Ok(list(value, index, field)?
        .iter()
        .map(|item| scalar(Some(item)))
        .filter(|item| !item.is_empty())
        .collect())
}

fn scalar(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
