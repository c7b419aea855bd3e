//! On-disk formats of the file-backed stores.
//!
//! Journal stores are JSON Lines, one [`JournalRow`] per line, checked
//! column by column so a hand-edited file fails with the offending line and
//! column. Taxonomy stores are a single pretty-printed JSON document.
//! Every write lands in a sibling `.partial` file first and is renamed over
//! the target once flushed.

use crate::error::StoreError;
use bibmesh_core::{JOURNAL_COLUMNS, JournalRow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Decode one record per non-blank line, keeping each record's 1-based line.
pub fn decode_lines<T: DeserializeOwned>(text: &str) -> Result<Vec<(usize, T)>, StoreError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .map(|record| (idx + 1, record))
                .map_err(|e| StoreError::Parse(idx + 1, e.to_string()))
        })
        .collect()
}

/// Encode records as JSON Lines, newline-terminated.
pub fn encode_lines<T: Serialize>(records: &[T]) -> Result<String, StoreError> {
    let mut out = String::new();
    for record in records {
        let line = serde_json::to_string(record).map_err(|e| StoreError::Serialize(e.to_string()))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Decode journal rows from JSON Lines text.
///
/// Each line must be an object whose columns carry the row schema's types;
/// the id must be non-blank and unique within the file.
pub fn decode_journal_lines(text: &str) -> Result<Vec<JournalRow>, StoreError> {
    let mut first_seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut rows = Vec::new();

    for (line, value) in decode_lines::<Value>(text)? {
        let Value::Object(object) = value else {
            return Err(StoreError::Malformed(format!(
                "line {line}: expected a journal object"
            )));
        };
        check_journal_columns(line, &object)?;

        let row: JournalRow = serde_json::from_value(Value::Object(object))
            .map_err(|e| StoreError::Parse(line, e.to_string()))?;
        let id = row.id.trim().to_string();
        if id.is_empty() {
            return Err(StoreError::Malformed(format!("line {line}: column `id` is blank")));
        }
        if let Some(first) = first_seen.insert(id.clone(), line) {
            return Err(StoreError::Malformed(format!(
                "line {line}: duplicate journal id `{id}` (first on line {first})"
            )));
        }
        rows.push(row);
    }
    Ok(rows)
}

#[derive(Clone, Copy)]
enum ColumnKind {
    Text,
    Flag,
    List,
}

fn column_kind(column: &str) -> ColumnKind {
    match column {
        "doaj_seal" | "apc" => ColumnKind::Flag,
        "languages" | "identifiers" => ColumnKind::List,
        _ => ColumnKind::Text,
    }
}

fn check_journal_columns(line: usize, object: &Map<String, Value>) -> Result<(), StoreError> {
    for column in JOURNAL_COLUMNS {
        let kind = column_kind(column);
        let Some(value) = object.get(column) else {
            if matches!(kind, ColumnKind::List) {
                continue;
            }
            return Err(StoreError::Malformed(format!(
                "line {line}: missing column `{column}`"
            )));
        };
        let expected = match kind {
            ColumnKind::Text if !value.is_string() => "a string",
            ColumnKind::Flag if !value.is_boolean() => "a boolean",
            ColumnKind::List
                if !value
                    .as_array()
                    .is_some_and(|items| items.iter().all(Value::is_string)) =>
            {
                "a list of strings"
            }
            _ => continue,
        };
        return Err(StoreError::Malformed(format!(
            "line {line}: column `{column}` must be {expected}"
        )));
    }
    Ok(())
}

/// Journal rows stored at `path`. A missing file holds no rows.
pub fn read_journal_file(path: impl AsRef<Path>) -> Result<Vec<JournalRow>, StoreError> {
    let path = path.as_ref();
    match read_text(path)? {
        Some(text) => decode_journal_lines(&text).map_err(|e| e.in_file(path)),
        None => Ok(Vec::new()),
    }
}

/// Replace the journal file at `path` with `rows`.
pub fn write_journal_file(path: impl AsRef<Path>, rows: &[JournalRow]) -> Result<(), StoreError> {
    let text = encode_lines(rows)?;
    commit(path.as_ref(), text.as_bytes())
}

/// JSON document stored at `path`, or `None` when the file does not exist.
pub fn read_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Option<T>, StoreError> {
    let path = path.as_ref();
    let Some(text) = read_text(path)? else {
        return Ok(None);
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| StoreError::Parse(e.line(), format!("{}: {e}", path.display())))
}

/// Replace the JSON document at `path` with `document`, pretty-printed.
pub fn write_document<T: Serialize>(path: impl AsRef<Path>, document: &T) -> Result<(), StoreError> {
    let mut bytes =
        serde_json::to_vec_pretty(document).map_err(|e| StoreError::Serialize(e.to_string()))?;
    bytes.push(b'\n');
    commit(path.as_ref(), &bytes)
}

/// Whole file as UTF-8 text; `None` when it does not exist.
pub(crate) fn read_text(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(StoreError::Encoding(format!(
            "{}: not UTF-8 text",
            path.display()
        ))),
        Err(e) => Err(StoreError::Io(0, format!("{}: {e}", path.display()))),
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    path.with_file_name(format!(".{name}.{}.partial", std::process::id()))
}

fn commit(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let io_err = |at: &Path, e: io::Error| StoreError::Io(0, format!("{}: {e}", at.display()));

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }

    let partial = partial_path(path);
    let staged = File::create(&partial).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = staged.and_then(|()| fs::rename(&partial, path)) {
        let _ = fs::remove_file(&partial);
        return Err(io_err(path, e));
    }
    Ok(())
}
