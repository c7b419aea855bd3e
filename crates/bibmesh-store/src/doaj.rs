//! DOAJ CSV ingestion: journal metadata export -> typed journal rows.

use crate::error::StoreError;
use bibmesh_core::JournalRow;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

pub const TITLE_COLUMN: &str = "Journal title";
pub const PRINT_ISSN_COLUMN: &str = "Journal ISSN (print version)";
pub const ELECTRONIC_ISSN_COLUMN: &str = "Journal EISSN (online version)";
pub const LANGUAGES_COLUMN: &str = "Languages in which the journal accepts manuscripts";
pub const PUBLISHER_COLUMN: &str = "Publisher";
pub const SEAL_COLUMN: &str = "DOAJ Seal";
pub const LICENSE_COLUMN: &str = "Journal license";
pub const APC_COLUMN: &str = "APC";

/// Columns a DOAJ export must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    TITLE_COLUMN,
    PRINT_ISSN_COLUMN,
    ELECTRONIC_ISSN_COLUMN,
    LANGUAGES_COLUMN,
    PUBLISHER_COLUMN,
    SEAL_COLUMN,
    LICENSE_COLUMN,
    APC_COLUMN,
];

/// Read a DOAJ CSV file into journal rows.
pub fn read_journal_csv(path: impl AsRef<Path>) -> Result<Vec<JournalRow>, StoreError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| StoreError::Io(0, format!("{}: {e}", path.display())))?;
    parse_journal_csv(file)
}

/// Parse DOAJ CSV content into journal rows.
///
/// A missing required column is `Malformed`; a record that cannot be read
/// is a `Parse` error carrying its 1-based line.
pub fn parse_journal_csv(reader: impl Read) -> Result<Vec<JournalRow>, StoreError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| StoreError::Parse(1, e.to_string()))?
        .clone();

    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|header| header.trim() == column)
            .ok_or_else(|| StoreError::Malformed(format!("missing DOAJ column `{column}`")))?;
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
            StoreError::Parse(line, e.to_string())
        })?;
        let cell = |index: usize| record.get(positions[index]).unwrap_or("").trim();
        rows.push(journal_row(
            cell(0),
            cell(1),
            cell(2),
            cell(3),
            cell(4),
            cell(5),
            cell(6),
            cell(7),
        ));
    }

    tracing::debug!(rows = rows.len(), "parsed DOAJ CSV");
    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
fn journal_row(
    title: &str,
    print_issn: &str,
    electronic_issn: &str,
    languages: &str,
    publisher: &str,
    seal: &str,
    license: &str,
    apc: &str,
) -> JournalRow {
    let id = [electronic_issn, print_issn, title]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let identifiers: BTreeSet<String> = [id.as_str(), print_issn, electronic_issn, title]
        .into_iter()
        .filter(|identifier| !identifier.is_empty())
        .map(str::to_string)
        .collect();

    let languages: BTreeSet<String> = languages
        .split(',')
        .map(str::trim)
        .filter(|language| !language.is_empty())
        .map(str::to_string)
        .collect();

    JournalRow {
        id,
        title: title.to_string(),
        print_issn: print_issn.to_string(),
        electronic_issn: electronic_issn.to_string(),
        languages: languages.into_iter().collect(),
        publisher: publisher.to_string(),
        doaj_seal: is_yes(seal),
        license: license.to_string(),
        apc: is_yes(apc),
        identifiers: identifiers.into_iter().collect(),
    }
}

fn is_yes(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case("yes")
}
