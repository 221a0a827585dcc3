use gamelib_core::{Collection, GameEntry, LibraryStore, LoadStatus};
use std::fs;
use tempfile::TempDir;

fn titles(collection: &Collection, query: &str) -> Vec<String> {
    collection
        .find(query)
        .map(|g| g.title().to_string())
        .collect()
}

#[test]
fn add_search_remove_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("library.json");

    let mut collection = Collection::initialize(LibraryStore::new(&path));
    assert!(collection.is_empty());

    let chess = GameEntry::new("Chess", "Ada", "chess.exe").unwrap();
    let go = GameEntry::new("Go", "Ken", "go.exe").unwrap();
    collection.add(chess.clone()).unwrap();
    collection.add(go.clone()).unwrap();

    assert_eq!(titles(&collection, "ch"), vec!["Chess"]);
    assert_eq!(titles(&collection, "K"), vec!["Go"]);

    collection.remove(chess.id()).unwrap();

    let reloaded = Collection::initialize(LibraryStore::new(&path));
    assert_eq!(reloaded.load_status(), &LoadStatus::Loaded { count: 1 });
    assert_eq!(reloaded.entries(), &[go]);
}

#[test]
fn library_written_by_older_version_is_upgraded_on_save() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("library.json");
    fs::write(
        &path,
        r#"[
    {
        "title": "Chess",
        "author": "Ada",
        "exe": "C:/Games/Chess/chess.exe",
        "icon": "C:/Games/Chess/chess.png"
    }
]"#,
    )
    .unwrap();

    let mut collection = Collection::initialize(LibraryStore::new(&path));
    assert_eq!(collection.len(), 1);
    let chess_id = collection.entries()[0].id();

    collection
        .add(GameEntry::new("Go", "Ken", "go.exe").unwrap())
        .unwrap();

    // Ids assigned on load are now stable across sessions
    let reloaded = Collection::initialize(LibraryStore::new(&path));
    assert_eq!(reloaded.entries()[0].id(), chess_id);
    assert_eq!(titles(&reloaded, ""), vec!["Chess", "Go"]);
}

#[test]
fn corrupted_library_starts_empty_and_keeps_a_copy() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("library.json");
    fs::write(&path, "[{\"title\": \"Chess\",").unwrap();

    let mut collection = Collection::initialize(LibraryStore::new(&path));
    assert!(collection.is_empty());
    assert!(collection.load_status().is_degraded());

    collection
        .add(GameEntry::new("Go", "Ken", "go.exe").unwrap())
        .unwrap();

    let backups: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(
        fs::read_to_string(backups[0].path()).unwrap(),
        "[{\"title\": \"Chess\","
    );
}
