//! Identifier normalization: the one comparison key shared by both stores.
//!
//! Journal rows and taxonomy exports never share a key space. ISSNs show up
//! with and without hyphens, titles vary in case and punctuation, category
//! codes carry stray whitespace. Every cross-store lookup routes through
//! [`normalize`] so that those spellings collapse to the same key.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn non_alphanumeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9a-z]+").expect("normalization regex must compile"))
}

/// Reduce an identifier to its canonical comparison key.
///
/// Trims, lower-cases, then drops every character outside `[0-9a-z]`.
/// `"1234-5678"`, `"1234 5678"` and `"12345678"` all map to `"12345678"`.
pub fn normalize(identifier: &str) -> String {
    let lowered = identifier.trim().to_lowercase();
    non_alphanumeric_re().replace_all(&lowered, "").into_owned()
}

/// [`normalize`] for optional input; absent values map to the empty key.
pub fn normalize_opt(identifier: Option<&str>) -> String {
    identifier.map(normalize).unwrap_or_default()
}

/// Hyphen-stripped alias form (`"1520-6149"` -> `"15206149"`).
pub fn strip_hyphens(identifier: &str) -> String {
    identifier.replace('-', "")
}

/// Normalized request set for a filter argument.
///
/// Blank entries are dropped, so an argument made only of blanks behaves
/// like an empty request (vacuous match).
pub fn normalize_set<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| normalize(value.as_ref()))
        .filter(|key| !key.is_empty())
        .collect()
}

/// Whether a normalized request set is satisfied by `candidates`.
///
/// An empty request matches everything.
pub fn intersects_or_vacuous<I, S>(request: &BTreeSet<String>, candidates: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    request.is_empty()
        || candidates
            .into_iter()
            .any(|candidate| request.contains(&normalize(candidate.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issn_spellings_collapse() {
        assert_eq!(normalize("1234-5678"), "12345678");
        assert_eq!(normalize("1234 5678"), "12345678");
        assert_eq!(normalize(" 1234-5678 "), "12345678");
        assert_eq!(normalize("2049-363X"), "2049363x");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "",
            "  ",
            "Journal of Things: Part B",
            "CC BY-NC-SA",
            "Q1",
            "Ångström Letters",
            "10.1/x",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(normalize("Ångström"), "ngstrm");
    }

    #[test]
    fn absent_input_normalizes_to_empty() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some(" A-b ")), "ab");
    }

    #[test]
    fn blank_request_entries_are_ignored() {
        let request = normalize_set(["", " ", "-"]);
        assert!(request.is_empty());
        assert!(intersects_or_vacuous(&request, Vec::<String>::new()));
    }

    #[test]
    fn request_matches_on_normalized_key() {
        let request = normalize_set(["q1"]);
        assert!(intersects_or_vacuous(&request, ["Q1", "Q2"]));
        assert!(!intersects_or_vacuous(&request, ["Q3"]));
        assert!(!intersects_or_vacuous(&request, Vec::<&str>::new()));
    }
}
