//! On-disk storage for the game library.
//!
//! The library is a single JSON array of game entries in a fixed-path file
//! (`library.json` by default). Loading never fails: a missing file is an
//! empty library, and an unreadable one degrades to empty as well, with the
//! reason reported through [`LoadStatus`] and the broken file copied aside.
//!
//! Saving overwrites the whole file in place. There is no atomic rename, so
//! a crash mid-write can leave a truncated file behind; the next load then
//! reports it as unreadable.

use crate::error::{LibraryError, Result};
use crate::GameEntry;
use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default library file, relative to the working directory.
pub const LIBRARY_FILE: &str = "library.json";

const INDENT: &[u8] = b"    ";

/// Outcome of reading the library file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded { count: usize },
    /// No library file yet; starts empty.
    Missing,
    /// The file existed but could not be read or decoded. `backup` is where
    /// the original bytes were copied, if that succeeded.
    Unreadable {
        reason: String,
        backup: Option<PathBuf>,
    },
}

impl LoadStatus {
    /// True when existing data could not be used.
    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadStatus::Unreadable { .. })
    }
}

#[derive(Debug, Clone)]
pub struct LoadedLibrary {
    pub games: Vec<GameEntry>,
    pub status: LoadStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryStore {
    path: PathBuf,
}

impl Default for LibraryStore {
    fn default() -> Self {
        Self::new(LIBRARY_FILE)
    }
}

impl LibraryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the library from disk, falling back to an empty library.
    pub fn load(&self) -> LoadedLibrary {
        if !self.path.exists() {
            tracing::debug!("No library file at {:?}, starting empty", self.path);
            return LoadedLibrary {
                games: Vec::new(),
                status: LoadStatus::Missing,
            };
        }

        match read_games(&self.path) {
            Ok(games) => {
                tracing::info!("Loaded {} games from {:?}", games.len(), self.path);
                let count = games.len();
                LoadedLibrary {
                    games,
                    status: LoadStatus::Loaded { count },
                }
            }
            Err(e) => {
                let reason = format!("{e:#}");
                tracing::warn!(
                    "Library file {:?} is unreadable, starting empty: {}",
                    self.path,
                    reason
                );
                let backup = self.preserve_unreadable();
                LoadedLibrary {
                    games: Vec::new(),
                    status: LoadStatus::Unreadable { reason, backup },
                }
            }
        }
    }

    /// Overwrite the library file with `games`, in order.
    pub fn save(&self, games: &[GameEntry]) -> Result<()> {
        let content = encode(games)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LibraryError::StorageUnwritable {
                path: self.path.clone(),
                source,
            })?;
        }

        fs::write(&self.path, content).map_err(|source| LibraryError::StorageUnwritable {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!("Saved {} games to {:?}", games.len(), self.path);
        Ok(())
    }

    /// Copy an unreadable library file next to itself with a timestamped
    /// suffix, so the next save does not destroy the only copy.
    fn preserve_unreadable(&self) -> Option<PathBuf> {
        let file_name = self.path.file_name()?.to_string_lossy().into_owned();
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let backup = self
            .path
            .with_file_name(format!("{}.corrupt-{}", file_name, timestamp));

        match fs::copy(&self.path, &backup) {
            Ok(_) => {
                tracing::warn!("Kept unreadable library file as {:?}", backup);
                Some(backup)
            }
            Err(e) => {
                tracing::warn!("Failed to back up unreadable library file {:?}: {}", self.path, e);
                None
            }
        }
    }
}

fn read_games(path: &Path) -> anyhow::Result<Vec<GameEntry>> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read library file: {:?}", path))?;
    let games = serde_json::from_str(&content).context("Library file is not a valid game list")?;
    Ok(games)
}

fn encode(games: &[GameEntry]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    games.serialize(&mut serializer)?;
    Ok(buf)
}
