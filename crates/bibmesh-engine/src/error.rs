//! Handler setup and upload errors.

use bibmesh_store::StoreError;

/// A store location a handler cannot be configured with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("store location is empty")]
    Empty,

    #[error("remote store `{0}` is not supported; use a local file path")]
    Remote(String),
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload handler has no store configured")]
    Unconfigured,

    #[error("input file not found: {0}")]
    MissingInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
