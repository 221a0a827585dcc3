//! The in-memory game library for one session.
//!
//! A [`Collection`] is created by loading a [`LibraryStore`] once and is then
//! the single owner of the working list. Every successful mutation is written
//! back to the store before the call returns. If the write fails, the
//! mutation is undone so memory keeps matching the last good save.

use crate::error::{LibraryError, Result};
use crate::store::{LibraryStore, LoadStatus};
use crate::{operations, EntryId, GameDetails, GameEntry};
use std::slice;

#[derive(Debug)]
pub struct Collection {
    store: LibraryStore,
    games: Vec<GameEntry>,
    load_status: LoadStatus,
}

impl Collection {
    /// Load the library from `store`. This is the only way to get a
    /// `Collection`, so every other operation runs on a loaded library.
    pub fn initialize(store: LibraryStore) -> Self {
        let loaded = store.load();
        Self {
            store,
            games: loaded.games,
            load_status: loaded.status,
        }
    }

    pub fn store(&self) -> &LibraryStore {
        &self.store
    }

    /// How the initial load went. Frontends can surface a degraded load to the user.
    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[GameEntry] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&GameEntry> {
        self.games.iter().find(|g| g.id() == id)
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.games.iter().position(|g| g.id() == id)
    }

    /// Append an entry and save. Returns the id the entry is stored under.
    pub fn add(&mut self, mut entry: GameEntry) -> Result<EntryId> {
        if self.get(entry.id()).is_some() {
            // Same id twice would make the copies indistinguishable
            entry.reassign_id();
            tracing::debug!("Re-keyed duplicate entry {} as {}", entry.title(), entry.id());
        }

        let id = entry.id();
        self.games.push(entry);

        if let Err(e) = self.store.save(&self.games) {
            self.games.pop();
            tracing::warn!("Add rolled back: {}", e);
            return Err(e);
        }

        Ok(id)
    }

    /// Remove the entry with `id` and save. An unknown id is a no-op.
    pub fn remove(&mut self, id: EntryId) -> Result<Option<GameEntry>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let removed = self.games.remove(index);

        if let Err(e) = self.store.save(&self.games) {
            self.games.insert(index, removed);
            tracing::warn!("Remove rolled back: {}", e);
            return Err(e);
        }

        Ok(Some(removed))
    }

    /// Remove every entry structurally equal to `entry` and save.
    /// Returns how many were removed.
    pub fn remove_matching(&mut self, entry: &GameEntry) -> Result<usize> {
        let before = self.games.clone();
        self.games.retain(|g| g != entry);

        let removed = before.len() - self.games.len();
        if removed == 0 {
            return Ok(0);
        }

        if let Err(e) = self.store.save(&self.games) {
            self.games = before;
            tracing::warn!("Remove rolled back: {}", e);
            return Err(e);
        }

        Ok(removed)
    }

    /// Replace the editable fields of an entry in place and save.
    pub fn edit(&mut self, id: EntryId, details: GameDetails) -> Result<()> {
        let index = self.position(id).ok_or(LibraryError::EntryNotFound(id))?;
        let previous = self.games[index].clone();

        self.games[index].apply(details)?;

        if let Err(e) = self.store.save(&self.games) {
            self.games[index] = previous;
            tracing::warn!("Edit rolled back: {}", e);
            return Err(e);
        }

        Ok(())
    }

    /// Entries whose title or author contains `query`, ignoring case.
    /// An empty query matches everything. The iterator is lazy and can be
    /// cloned to walk the results again.
    pub fn find(&self, query: &str) -> Matches<'_> {
        Matches {
            games: self.games.iter(),
            needle: query.to_lowercase(),
        }
    }

    /// Start the entry's executable. Does not touch storage.
    pub fn launch(&self, id: EntryId) -> Result<()> {
        let entry = self.get(id).ok_or(LibraryError::EntryNotFound(id))?;
        operations::launch(entry).map_err(LibraryError::Launch)
    }
}

/// Search results from [`Collection::find`].
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    games: slice::Iter<'a, GameEntry>,
    needle: String,
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a GameEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_str();
        self.games.find(|g| g.matches(needle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.games.size_hint().1)
    }
}
