//! Error types for library storage and collection management.

use crate::game::EntryId;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LibraryError>;

#[derive(Debug, Error)]
pub enum LibraryError {
    /// A required field was empty when building or editing an entry.
    #[error("game entry field `{field}` must not be empty")]
    InvalidEntry { field: &'static str },

    #[error("failed to write library file {path:?}: {source}")]
    StorageUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode library: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no game with id {0} in the library")]
    EntryNotFound(EntryId),

    #[error("failed to launch game: {0:#}")]
    Launch(anyhow::Error),
}
