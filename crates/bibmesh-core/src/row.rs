//! Typed rows exchanged with store adapters.

use serde::{Deserialize, Serialize};

/// Canonical column schema of a journal row.
pub const JOURNAL_COLUMNS: [&str; 10] = [
    "id",
    "title",
    "print_issn",
    "electronic_issn",
    "languages",
    "publisher",
    "doaj_seal",
    "license",
    "apc",
    "identifiers",
];

/// One journal as returned by a journal store.
///
/// Scalar columns are required; a row missing one is rejected at
/// deserialization time. List columns default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRow {
    pub id: String,
    pub title: String,
    pub print_issn: String,
    pub electronic_issn: String,
    #[serde(default)]
    pub languages: Vec<String>,
    pub publisher: String,
    pub doaj_seal: bool,
    pub license: String,
    pub apc: bool,
    #[serde(default)]
    pub identifiers: Vec<String>,
}

impl JournalRow {
    /// Row with only an id; every other column empty or `false`.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            print_issn: String::new(),
            electronic_issn: String::new(),
            languages: Vec::new(),
            publisher: String::new(),
            doaj_seal: false,
            license: String::new(),
            apc: false,
            identifiers: Vec::new(),
        }
    }

    /// Every identifier this row can be addressed by.
    ///
    /// The explicit `identifiers` column comes first, then id, ISSNs and title.
    /// Blank values are skipped and the first occurrence of a repeat is kept.
    pub fn known_identifiers(&self) -> Vec<&str> {
        let mut known: Vec<&str> = Vec::new();
        let explicit = self.identifiers.iter().map(String::as_str);
        let intrinsic = [
            self.id.as_str(),
            self.print_issn.as_str(),
            self.electronic_issn.as_str(),
            self.title.as_str(),
        ];
        for identifier in explicit.chain(intrinsic) {
            let identifier = identifier.trim();
            if !identifier.is_empty() && !known.contains(&identifier) {
                known.push(identifier);
            }
        }
        known
    }
}

/// Discovered type of an entity found by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Journal,
    Category,
    Area,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Journal => "journal",
            EntityKind::Category => "category",
            EntityKind::Area => "area",
        }
    }
}

/// A taxonomy entity located by identifier, tagged with its kind.
///
/// Categories fill `quartiles` and `areas`; areas fill `categories`;
/// journals fill `categories` and `areas` with their links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntityRow {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quartiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub areas: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

/// One category in a taxonomy listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: String,
    #[serde(default)]
    pub quartiles: Vec<String>,
    #[serde(default)]
    pub areas: Vec<String>,
}

/// One area in a taxonomy listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRow {
    pub id: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_identifiers_put_explicit_list_first() {
        let row = JournalRow {
            title: "Signal Processing".into(),
            print_issn: "1520-6149".into(),
            identifiers: vec!["1520-6149".into(), " ".into(), "alt".into()],
            ..JournalRow::with_id("10.1/x")
        };

        assert_eq!(
            row.known_identifiers(),
            vec!["1520-6149", "alt", "10.1/x", "Signal Processing"]
        );
    }

    #[test]
    fn row_missing_scalar_column_is_rejected() {
        let raw = r#"{"id":"J1","title":"T","print_issn":"","electronic_issn":"",
            "publisher":"","license":"","apc":false}"#;
        let err = serde_json::from_str::<JournalRow>(raw).expect_err("doaj_seal is required");
        assert!(err.to_string().contains("doaj_seal"));
    }

    #[test]
    fn row_list_columns_default_to_empty() {
        let raw = r#"{"id":"J1","title":"T","print_issn":"","electronic_issn":"",
            "publisher":"","license":"","apc":false,"doaj_seal":true}"#;
        let row: JournalRow = serde_json::from_str(raw).expect("row parses");
        assert!(row.languages.is_empty());
        assert!(row.identifiers.is_empty());
        assert!(row.doaj_seal);
    }

    #[test]
    fn entity_row_uses_type_tag() {
        let row = TaxonomyEntityRow {
            kind: EntityKind::Area,
            id: "Medicine".into(),
            quartiles: Vec::new(),
            areas: Vec::new(),
            categories: vec!["Oncology".into()],
        };
        let value = serde_json::to_value(&row).expect("row serializes");
        assert_eq!(value["type"], "area");
        assert!(value.get("quartiles").is_none());
    }
}
