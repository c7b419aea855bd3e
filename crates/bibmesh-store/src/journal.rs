//! Journal stores: one row per journal, queried by id, text, license and flags.

use crate::error::StoreError;
use crate::persist::{read_journal_file, write_journal_file};
use bibmesh_core::{JournalRow, normalize, normalize_set, strip_hyphens};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// Fetch contract every journal store honors.
///
/// Each call returns a complete (possibly empty) row set or an explicit
/// error; there is no partial result.
pub trait JournalStore: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<JournalRow>, StoreError>;
    fn fetch_by_id(&self, identifier: &str) -> Result<Vec<JournalRow>, StoreError>;
    fn fetch_by_title(&self, title_part: &str) -> Result<Vec<JournalRow>, StoreError>;
    fn fetch_by_publisher(&self, publisher_part: &str) -> Result<Vec<JournalRow>, StoreError>;
    fn fetch_by_license(&self, licenses: &[String]) -> Result<Vec<JournalRow>, StoreError>;
    fn fetch_with_apc(&self) -> Result<Vec<JournalRow>, StoreError>;
    fn fetch_with_doaj_seal(&self) -> Result<Vec<JournalRow>, StoreError>;

    /// Upsert rows by id. Returns the number of rows written.
    fn ingest(&self, rows: Vec<JournalRow>) -> Result<usize, StoreError>;
}

/// In-memory journal table with a normalized identifier index.
#[derive(Debug, Clone, Default)]
pub struct JournalTable {
    rows: Vec<JournalRow>,
    positions: BTreeMap<String, usize>,
    index: BTreeMap<String, String>,
}

impl JournalTable {
    pub fn from_rows(rows: Vec<JournalRow>) -> Self {
        let mut table = Self::default();
        table.upsert(rows);
        table
    }

    /// Insert rows, replacing any existing row with the same id.
    ///
    /// Identifier index entries follow the latest row that claims them. A
    /// replaced row's identifiers stop resolving unless the new row keeps them.
    pub fn upsert(&mut self, rows: Vec<JournalRow>) -> usize {
        let mut written = 0;
        for row in rows {
            if let Some(&position) = self.positions.get(&row.id) {
                for key in index_keys(&self.rows[position]) {
                    if self.index.get(&key) == Some(&row.id) {
                        self.index.remove(&key);
                    }
                }
            }
            for key in index_keys(&row) {
                self.index.insert(key, row.id.clone());
            }
            match self.positions.get(&row.id) {
                Some(&position) => self.rows[position] = row,
                None => {
                    self.positions.insert(row.id.clone(), self.rows.len());
                    self.rows.push(row);
                }
            }
            written += 1;
        }
        written
    }

    pub fn rows(&self) -> &[JournalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn all(&self) -> Vec<JournalRow> {
        self.rows.clone()
    }

    /// Rows addressed by any of their identifiers.
    ///
    /// The index answers first; when it misses, every row's identifiers
    /// are compared on their normalized form.
    pub fn by_identifier(&self, identifier: &str) -> Vec<JournalRow> {
        let key = normalize(identifier);
        if key.is_empty() {
            return Vec::new();
        }

        let indexed = self
            .index
            .get(&key)
            .or_else(|| self.index.get(&normalize(&strip_hyphens(identifier))))
            .and_then(|id| self.positions.get(id))
            .map(|&position| self.rows[position].clone());
        if let Some(row) = indexed {
            return vec![row];
        }

        self.rows
            .iter()
            .filter(|row| {
                row.known_identifiers()
                    .into_iter()
                    .any(|candidate| normalize(candidate) == key)
            })
            .cloned()
            .collect()
    }

    /// Case-insensitive substring match on title. An empty needle matches all.
    pub fn by_title(&self, title_part: &str) -> Vec<JournalRow> {
        self.filter_text(title_part, |row| &row.title)
    }

    /// Case-insensitive substring match on publisher. An empty needle matches all.
    pub fn by_publisher(&self, publisher_part: &str) -> Vec<JournalRow> {
        self.filter_text(publisher_part, |row| &row.publisher)
    }

    /// Rows whose normalized license is in the requested set (all rows when empty).
    pub fn by_license(&self, licenses: &[String]) -> Vec<JournalRow> {
        let requested = normalize_set(licenses);
        if requested.is_empty() {
            return self.all();
        }
        self.rows
            .iter()
            .filter(|row| requested.contains(&normalize(&row.license)))
            .cloned()
            .collect()
    }

    pub fn with_apc(&self) -> Vec<JournalRow> {
        self.rows.iter().filter(|row| row.apc).cloned().collect()
    }

    pub fn with_doaj_seal(&self) -> Vec<JournalRow> {
        self.rows.iter().filter(|row| row.doaj_seal).cloned().collect()
    }

    fn filter_text(&self, needle: &str, field: impl Fn(&JournalRow) -> &String) -> Vec<JournalRow> {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return self.all();
        }
        self.rows
            .iter()
            .filter(|row| field(row).to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

/// Normalized and hyphen-stripped keys of every identifier of `row`.
fn index_keys(row: &JournalRow) -> Vec<String> {
    let mut keys = Vec::new();
    for identifier in row.known_identifiers() {
        for key in [normalize(identifier), normalize(&strip_hyphens(identifier))] {
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

/// Shared in-process journal store.
///
/// Clones share one table, so an upload handler and a query handler built
/// from the same handle see the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryJournalStore {
    table: Arc<RwLock<JournalTable>>,
}

impl MemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<JournalRow>) -> Self {
        Self {
            table: Arc::new(RwLock::new(JournalTable::from_rows(rows))),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, JournalTable>, StoreError> {
        self.table
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl JournalStore for MemoryJournalStore {
    fn fetch_all(&self) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.read()?.all())
    }

    fn fetch_by_id(&self, identifier: &str) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.read()?.by_identifier(identifier))
    }

    fn fetch_by_title(&self, title_part: &str) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.read()?.by_title(title_part))
    }

    fn fetch_by_publisher(&self, publisher_part: &str) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.read()?.by_publisher(publisher_part))
    }

    fn fetch_by_license(&self, licenses: &[String]) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.read()?.by_license(licenses))
    }

    fn fetch_with_apc(&self) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.read()?.with_apc())
    }

    fn fetch_with_doaj_seal(&self) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.read()?.with_doaj_seal())
    }

    fn ingest(&self, rows: Vec<JournalRow>) -> Result<usize, StoreError> {
        let mut table = self
            .table
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(table.upsert(rows))
    }
}

/// Journal store persisted as a JSONL file, reloaded on every call.
///
/// A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonlJournalStore {
    path: PathBuf,
}

impl JsonlJournalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<JournalTable, StoreError> {
        Ok(JournalTable::from_rows(read_journal_file(&self.path)?))
    }
}

impl JournalStore for JsonlJournalStore {
    fn fetch_all(&self) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.load()?.all())
    }

    fn fetch_by_id(&self, identifier: &str) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.load()?.by_identifier(identifier))
    }

    fn fetch_by_title(&self, title_part: &str) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.load()?.by_title(title_part))
    }

    fn fetch_by_publisher(&self, publisher_part: &str) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.load()?.by_publisher(publisher_part))
    }

    fn fetch_by_license(&self, licenses: &[String]) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.load()?.by_license(licenses))
    }

    fn fetch_with_apc(&self) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.load()?.with_apc())
    }

    fn fetch_with_doaj_seal(&self) -> Result<Vec<JournalRow>, StoreError> {
        Ok(self.load()?.with_doaj_seal())
    }

    fn ingest(&self, rows: Vec<JournalRow>) -> Result<usize, StoreError> {
        let mut table = self.load()?;
        let written = table.upsert(rows);
        write_journal_file(&self.path, table.rows())?;
        tracing::debug!(
            path = %self.path.display(),
            written,
            total = table.len(),
            "journal store persisted"
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::tests::temp_path;

    fn row(id: &str, title: &str, publisher: &str, license: &str, apc: bool, seal: bool) -> JournalRow {
        JournalRow {
            title: title.into(),
            publisher: publisher.into(),
            license: license.into(),
            apc,
            doaj_seal: seal,
            identifiers: vec![id.into()],
            ..JournalRow::with_id(id)
        }
    }

    fn sample() -> JournalTable {
        JournalTable::from_rows(vec![
            row("1520-6149", "Signal Processing Letters", "IEEE", "CC BY", true, false),
            row("2049-363X", "Open Biology", "The Royal Society", "CC BY-NC", false, true),
            row("0000-0001", "Diamond Review", "Small Press", "cc-by", false, false),
        ])
    }

    #[test]
    fn identifier_lookup_accepts_any_spelling() {
        let table = sample();
        assert_eq!(table.by_identifier("15206149")[0].id, "1520-6149");
        assert_eq!(table.by_identifier(" 2049 363x ")[0].id, "2049-363X");
        assert_eq!(table.by_identifier("open biology")[0].id, "2049-363X");
        assert!(table.by_identifier("").is_empty());
        assert!(table.by_identifier("9999-9999").is_empty());
    }

    #[test]
    fn text_filters_are_case_insensitive() {
        let table = sample();
        let ids: Vec<String> = table.by_title("REVIEW").into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["0000-0001"]);
        assert_eq!(table.by_publisher("royal").len(), 1);
        assert_eq!(table.by_publisher("").len(), 3);
    }

    #[test]
    fn license_filter_uses_normalized_membership() {
        let table = sample();
        let ids: Vec<String> = table
            .by_license(&["CC-BY".to_string()])
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["1520-6149", "0000-0001"]);
        assert_eq!(table.by_license(&[]).len(), 3);
    }

    #[test]
    fn flag_filters_select_true_rows() {
        let table = sample();
        assert_eq!(table.with_apc().len(), 1);
        assert_eq!(table.with_doaj_seal()[0].id, "2049-363X");
    }

    #[test]
    fn upsert_replaces_rows_by_id() {
        let mut table = sample();
        table.upsert(vec![row("1520-6149", "Renamed", "IEEE", "CC BY", false, false)]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.by_identifier("1520-6149")[0].title, "Renamed");
    }

    #[test]
    fn upsert_retires_identifiers_of_the_replaced_row() {
        let store = MemoryJournalStore::new();
        store
            .ingest(vec![row("J", "Old Title", "Press", "CC BY", false, false)])
            .expect("first ingest");
        store
            .ingest(vec![row("J", "New Title", "Press", "CC BY", false, false)])
            .expect("second ingest");

        assert!(store.fetch_by_id("old title").expect("fetch").is_empty());
        let renamed = store.fetch_by_id("new title").expect("fetch");
        assert_eq!(renamed.len(), 1);
        assert_eq!(renamed[0].title, "New Title");
        assert_eq!(store.fetch_by_id("J").expect("fetch").len(), 1);
    }

    #[test]
    fn retired_identifier_keeps_other_claimants_reachable() {
        let mut table = JournalTable::from_rows(vec![
            row("A", "Shared Name", "Press", "CC BY", false, false),
            row("B", "Shared Name", "Press", "CC BY", false, false),
        ]);
        table.upsert(vec![row("B", "Other Name", "Press", "CC BY", false, false)]);

        let ids: Vec<String> = table
            .by_identifier("shared name")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["A"]);
    }

    #[test]
    fn memory_store_clones_share_rows() {
        let store = MemoryJournalStore::new();
        let reader = store.clone();
        store
            .ingest(vec![JournalRow::with_id("J1")])
            .expect("ingest succeeds");
        assert_eq!(reader.fetch_all().expect("fetch succeeds").len(), 1);
    }

    #[test]
    fn jsonl_store_persists_across_instances() {
        let path = temp_path("journals", "jsonl");
        let store = JsonlJournalStore::new(&path);
        assert!(store.fetch_all().expect("missing file is empty").is_empty());

        store
            .ingest(sample().all())
            .expect("ingest succeeds");
        let reopened = JsonlJournalStore::new(&path);
        assert_eq!(reopened.fetch_with_doaj_seal().expect("fetch").len(), 1);
        assert_eq!(reopened.fetch_by_id("15206149").expect("fetch").len(), 1);

        let _ = std::fs::remove_file(path);
    }
}
