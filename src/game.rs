use crate::error::{LibraryError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier assigned to a game entry when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

// Entries written before ids existed get a fresh one on load.
impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The user-editable part of a game entry, as collected from an add or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameDetails {
    pub title: String,
    pub author: String,
    pub exe: PathBuf,
    pub icon: Option<PathBuf>,
}

impl GameDetails {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        exe: impl Into<PathBuf>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            exe: exe.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(LibraryError::InvalidEntry { field: "title" });
        }
        if self.author.trim().is_empty() {
            return Err(LibraryError::InvalidEntry { field: "author" });
        }
        if self.exe.as_os_str().is_empty() {
            return Err(LibraryError::InvalidEntry { field: "exe" });
        }
        Ok(())
    }
}

/// One playable local game as stored in the library file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    #[serde(default)]
    id: EntryId,
    title: String,
    author: String,
    exe: PathBuf,
    #[serde(
        default,
        deserialize_with = "deserialize_icon",
        skip_serializing_if = "Option::is_none"
    )]
    icon: Option<PathBuf>,
}

// Older library files store a missing icon as "".
fn deserialize_icon<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<PathBuf>::deserialize(deserializer).map(non_empty)
}

impl GameEntry {
    /// Create an entry with a fresh id. Title, author and exe must be non-empty.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        exe: impl Into<PathBuf>,
    ) -> Result<Self> {
        Self::from_details(GameDetails::new(title, author, exe))
    }

    pub fn from_details(details: GameDetails) -> Result<Self> {
        details.validate()?;
        Ok(Self {
            id: EntryId::new(),
            title: details.title,
            author: details.author,
            exe: details.exe,
            icon: non_empty(details.icon),
        })
    }

    /// Attach an icon path. An empty path clears the icon.
    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = non_empty(Some(icon.into()));
        self
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    pub fn details(&self) -> GameDetails {
        GameDetails {
            title: self.title.clone(),
            author: self.author.clone(),
            exe: self.exe.clone(),
            icon: self.icon.clone(),
        }
    }

    /// Replace the editable fields, keeping the id. Leaves the entry untouched on error.
    pub(crate) fn apply(&mut self, details: GameDetails) -> Result<()> {
        details.validate()?;
        self.title = details.title;
        self.author = details.author;
        self.exe = details.exe;
        self.icon = non_empty(details.icon);
        Ok(())
    }

    pub(crate) fn reassign_id(&mut self) {
        self.id = EntryId::new();
    }

    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
    }
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_missing_fields() {
        assert!(matches!(
            GameEntry::new("", "Ada", "chess.exe"),
            Err(LibraryError::InvalidEntry { field: "title" })
        ));
        assert!(matches!(
            GameEntry::new("Chess", "   ", "chess.exe"),
            Err(LibraryError::InvalidEntry { field: "author" })
        ));
        assert!(matches!(
            GameEntry::new("Chess", "Ada", ""),
            Err(LibraryError::InvalidEntry { field: "exe" })
        ));
    }

    #[test]
    fn test_identical_content_gets_distinct_ids() {
        let a = GameEntry::new("Chess", "Ada", "chess.exe").unwrap();
        let b = GameEntry::new("Chess", "Ada", "chess.exe").unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
        assert_eq!(a.details(), b.details());
    }

    #[test]
    fn test_empty_icon_is_no_icon() {
        let entry = GameEntry::new("Chess", "Ada", "chess.exe")
            .unwrap()
            .with_icon("");
        assert_eq!(entry.icon(), None);

        let entry = entry.with_icon("chess.png");
        assert_eq!(entry.icon(), Some(Path::new("chess.png")));
    }

    #[test]
    fn test_apply_keeps_id_and_rejects_invalid() {
        let mut entry = GameEntry::new("Chess", "Ada", "chess.exe").unwrap();
        let id = entry.id();

        entry
            .apply(GameDetails::new("Chess 2", "Ada L.", "chess2.exe").with_icon("c.png"))
            .unwrap();
        assert_eq!(entry.id(), id);
        assert_eq!(entry.title(), "Chess 2");
        assert_eq!(entry.icon(), Some(Path::new("c.png")));

        let before = entry.clone();
        assert!(entry.apply(GameDetails::new("", "x", "y")).is_err());
        assert_eq!(entry, before);
    }

    #[test]
    fn test_matches_title_or_author() {
        let entry = GameEntry::new("Chess", "Ada", "chess.exe").unwrap();
        assert!(entry.matches(""));
        assert!(entry.matches("ch"));
        assert!(entry.matches("ada"));
        assert!(!entry.matches("go"));
    }

    #[test]
    fn test_deserialize_without_id_assigns_one() {
        let json = r#"{"title": "Go", "author": "Ken", "exe": "go.exe"}"#;
        let entry: GameEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.title(), "Go");
        assert_eq!(entry.icon(), None);

        let again: GameEntry = serde_json::from_str(json).unwrap();
        assert_ne!(entry.id(), again.id());
    }

    #[test]
    fn test_deserialize_empty_icon_is_no_icon() {
        let json = r#"{"title": "Chess", "author": "Ada", "exe": "chess.exe", "icon": ""}"#;
        let entry: GameEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.icon(), None);
        assert!(!serde_json::to_string(&entry).unwrap().contains("icon"));

        let json = r#"{"title": "Go", "author": "Ken", "exe": "go.exe", "icon": null}"#;
        let entry: GameEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.icon(), None);
    }

    #[test]
    fn test_serialize_field_order_and_icon_omitted() {
        let entry = GameEntry::new("Go", "Ken", "go.exe").unwrap();
        let json = serde_json::to_string(&entry).unwrap();
        let expected = format!(
            r#"{{"id":"{}","title":"Go","author":"Ken","exe":"go.exe"}}"#,
            entry.id()
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn test_entry_id_parse_roundtrip() {
        let id = EntryId::new();
        let parsed: EntryId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<EntryId>().is_err());
    }
}
