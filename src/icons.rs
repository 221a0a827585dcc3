//! Icon lookup for game entries.
//!
//! An entry's icon is an optional path to an image on disk. Frontends either
//! want the path (to hand to their own image loader) or the raw bytes.
//! A missing, empty, or unreadable icon simply means "no icon".

use crate::GameEntry;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the icon path for an entry if it points at an existing file.
/// `file://` URLs are accepted and turned back into paths.
pub fn resolve_icon(entry: &GameEntry) -> Option<PathBuf> {
    let icon = entry.icon()?;
    let path = strip_file_url(icon);

    if path.as_os_str().is_empty() || !path.is_file() {
        return None;
    }

    Some(path)
}

/// Load the raw bytes of an entry's icon.
pub fn load_icon_data(entry: &GameEntry) -> Option<Vec<u8>> {
    let path = resolve_icon(entry)?;

    match read_icon(&path) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::debug!("Ignoring icon for {}: {:#}", entry.title(), e);
            None
        }
    }
}

fn read_icon(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).context(format!("Failed to read icon file: {:?}", path))
}

fn strip_file_url(icon: &Path) -> PathBuf {
    match icon.to_str().and_then(|s| s.strip_prefix("file://")) {
        Some(stripped) => PathBuf::from(stripped),
        None => icon.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry_with_icon(icon: impl Into<PathBuf>) -> GameEntry {
        GameEntry::new("Chess", "Ada", "chess.exe")
            .unwrap()
            .with_icon(icon)
    }

    #[test]
    fn test_no_icon() {
        let entry = GameEntry::new("Chess", "Ada", "chess.exe").unwrap();
        assert_eq!(resolve_icon(&entry), None);
        assert_eq!(load_icon_data(&entry), None);
    }

    #[test]
    fn test_missing_icon_file() {
        let temp_dir = TempDir::new().unwrap();
        let entry = entry_with_icon(temp_dir.path().join("missing.png"));
        assert_eq!(resolve_icon(&entry), None);
        assert_eq!(load_icon_data(&entry), None);
    }

    #[test]
    fn test_icon_pointing_at_directory() {
        let temp_dir = TempDir::new().unwrap();
        let entry = entry_with_icon(temp_dir.path());
        assert_eq!(resolve_icon(&entry), None);
    }

    #[test]
    fn test_existing_icon() {
        let temp_dir = TempDir::new().unwrap();
        let icon = temp_dir.path().join("chess.png");
        fs::write(&icon, b"\x89PNG fake").unwrap();

        let entry = entry_with_icon(&icon);
        assert_eq!(resolve_icon(&entry), Some(icon));
        assert_eq!(load_icon_data(&entry), Some(b"\x89PNG fake".to_vec()));
    }

    #[test]
    fn test_file_url_icon() {
        let temp_dir = TempDir::new().unwrap();
        let icon = temp_dir.path().join("go.png");
        fs::write(&icon, b"icon").unwrap();

        let entry = entry_with_icon(format!("file://{}", icon.display()));
        assert_eq!(resolve_icon(&entry), Some(icon));
    }
}
