//! Errors raised by store adapters.

use std::path::Path;

/// Failures at the adapter boundary.
///
/// Line numbers are 1-based; `0` means the failure is not tied to a line.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("line {0}: I/O error: {1}")]
    Io(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("unreadable store file: {0}")]
    Encoding(String),

    /// Input whose shape breaks the row/export contract.
    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("journal or taxonomy table lock poisoned: {0}")]
    Lock(String),
}

impl StoreError {
    /// Prefix a content error with the file it came from.
    pub(crate) fn in_file(self, path: &Path) -> Self {
        match self {
            Self::Parse(line, message) => Self::Parse(line, format!("{}: {message}", path.display())),
            Self::Malformed(message) => Self::Malformed(format!("{}: {message}", path.display())),
            other => other,
        }
    }
}
