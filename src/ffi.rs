//! FFI (Foreign Function Interface) bindings for native frontends.
//!
//! This module exposes the game collection through C-compatible functions
//! that can be called from Swift (macOS) and C# (Windows).
//!
//! # Memory Management
//!
//! - Rust allocates memory and returns pointers to Swift/C#
//! - The calling code MUST call the corresponding `_free` functions to prevent leaks
//! - Strings are null-terminated UTF-8
//! - Entry ids are passed as UUID strings
//!
//! # Usage from Swift (macOS)
//!
//! ```swift
//! let library = gamelib_open("library.json")
//! defer { gamelib_free(library) }
//!
//! let results = gamelib_search(library, searchText)
//! defer { gamelib_free_entry_list(results) }
//!
//! for i in 0..<gamelib_entry_list_count(results) {
//!     let entry = gamelib_entry_list_get(results, i)
//!     // Use entry data...
//!     gamelib_free_entry(entry)
//! }
//! ```
//!
//! # Usage from C# (Windows)
//!
//! ```csharp
//! [DllImport("gamelib_core.dll")]
//! private static extern IntPtr gamelib_open(string path);
//!
//! [DllImport("gamelib_core.dll")]
//! private static extern int gamelib_launch(IntPtr library, string id);
//! ```

use crate::icons::resolve_icon;
use crate::operations::{open_folder, open_library_file};
use crate::{Collection, EntryId, GameDetails, GameEntry, LibraryStore, LoadStatus};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::PathBuf;
use std::ptr;

// ============================================================================
// C-Compatible Types
// ============================================================================

/// Opaque handle to a loaded game collection
#[repr(C)]
pub struct CCollection {
    collection: Collection,
}

/// Opaque handle to a snapshot of entries (search results)
#[repr(C)]
pub struct CEntryList {
    entries: Vec<GameEntry>,
}

/// C-compatible game entry
///
/// Interior NUL characters in stored text are dropped, so `id`, `title`,
/// `author`, `exe` are never null.
#[repr(C)]
pub struct CGameEntry {
    pub id: *mut c_char,
    pub title: *mut c_char,
    pub author: *mut c_char,
    pub exe: *mut c_char,
    /// Icon file to display, null if the entry has no icon or the file is missing
    pub icon: *mut c_char,
    /// Stored icon path, null only if none is stored. Use this to fill edit forms.
    pub icon_path: *mut c_char,
}

/// Result code for operations
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CResultCode {
    Success = 0,
    Error = 1,
    NotFound = 2,
    InvalidArgument = 3,
}

/// How the library file was loaded
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CLoadStatus {
    Loaded = 0,
    Missing = 1,
    Unreadable = 2,
}

// ============================================================================
// Setup
// ============================================================================

/// Install a log subscriber writing to stderr.
/// `filter` is a tracing filter such as "info" or "gamelib_core=debug";
/// null means "info". Returns 0 on success, 1 if logging was already set up
/// or the filter is invalid.
#[no_mangle]
pub extern "C" fn gamelib_init_logging(filter: *const c_char) -> c_int {
    let filter = unsafe { c_str_arg(filter) }.unwrap_or("info");

    let env_filter = match tracing_subscriber::EnvFilter::try_new(filter) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Invalid log filter {:?}: {}", filter, e);
            return CResultCode::Error as c_int;
        }
    };

    match tracing_subscriber::fmt().with_env_filter(env_filter).try_init() {
        Ok(()) => CResultCode::Success as c_int,
        Err(_) => CResultCode::Error as c_int,
    }
}

// ============================================================================
// Collection Lifecycle
// ============================================================================

/// Load the game collection from `path` (null for the default `library.json`).
/// Never fails to load: check gamelib_load_status() for a degraded start.
/// Caller MUST call gamelib_free() when done.
#[no_mangle]
pub extern "C" fn gamelib_open(path: *const c_char) -> *mut CCollection {
    let store = if path.is_null() {
        LibraryStore::default()
    } else {
        match unsafe { c_str_arg(path) } {
            Some(p) => LibraryStore::new(PathBuf::from(p)),
            None => return ptr::null_mut(),
        }
    };

    let handle = Box::new(CCollection {
        collection: Collection::initialize(store),
    });
    Box::into_raw(handle)
}

/// Free a collection returned by gamelib_open().
#[no_mangle]
pub extern "C" fn gamelib_free(handle: *mut CCollection) {
    if !handle.is_null() {
        unsafe {
            let _ = Box::from_raw(handle);
        }
    }
}

/// Get how the library file was loaded. Unreadable means the frontend
/// should warn the user that their previous library could not be read.
#[no_mangle]
pub extern "C" fn gamelib_load_status(handle: *const CCollection) -> c_int {
    let Some(handle) = (unsafe { handle.as_ref() }) else {
        return CLoadStatus::Missing as c_int;
    };

    let status = match handle.collection.load_status() {
        LoadStatus::Loaded { .. } => CLoadStatus::Loaded,
        LoadStatus::Missing => CLoadStatus::Missing,
        LoadStatus::Unreadable { .. } => CLoadStatus::Unreadable,
    };
    status as c_int
}

// ============================================================================
// Reading Entries
// ============================================================================

/// Get the number of games in the collection.
#[no_mangle]
pub extern "C" fn gamelib_count(handle: *const CCollection) -> c_int {
    match unsafe { handle.as_ref() } {
        Some(handle) => handle.collection.len() as c_int,
        None => 0,
    }
}

/// Get the game at a specific index, in display order.
/// Caller MUST call gamelib_free_entry() when done.
#[no_mangle]
pub extern "C" fn gamelib_get(handle: *const CCollection, index: c_int) -> *mut CGameEntry {
    let Some(handle) = (unsafe { handle.as_ref() }) else {
        return ptr::null_mut();
    };

    match usize::try_from(index)
        .ok()
        .and_then(|idx| handle.collection.entries().get(idx))
    {
        Some(entry) => entry_to_c(entry),
        None => ptr::null_mut(),
    }
}

/// Search by title or author, ignoring case. An empty or null query returns
/// every game. Caller MUST call gamelib_free_entry_list() when done.
#[no_mangle]
pub extern "C" fn gamelib_search(handle: *const CCollection, query: *const c_char) -> *mut CEntryList {
    let Some(handle) = (unsafe { handle.as_ref() }) else {
        return ptr::null_mut();
    };

    let query = if query.is_null() {
        ""
    } else {
        match unsafe { c_str_arg(query) } {
            Some(q) => q,
            None => return ptr::null_mut(),
        }
    };

    let entries = handle.collection.find(query).cloned().collect();
    Box::into_raw(Box::new(CEntryList { entries }))
}

/// Get the number of entries in a list.
#[no_mangle]
pub extern "C" fn gamelib_entry_list_count(list: *const CEntryList) -> c_int {
    match unsafe { list.as_ref() } {
        Some(list) => list.entries.len() as c_int,
        None => 0,
    }
}

/// Get an entry from a list. Caller MUST call gamelib_free_entry() when done.
#[no_mangle]
pub extern "C" fn gamelib_entry_list_get(list: *const CEntryList, index: c_int) -> *mut CGameEntry {
    let Some(list) = (unsafe { list.as_ref() }) else {
        return ptr::null_mut();
    };

    match usize::try_from(index).ok().and_then(|idx| list.entries.get(idx)) {
        Some(entry) => entry_to_c(entry),
        None => ptr::null_mut(),
    }
}

/// Free a list returned by gamelib_search().
#[no_mangle]
pub extern "C" fn gamelib_free_entry_list(list: *mut CEntryList) {
    if !list.is_null() {
        unsafe {
            let _ = Box::from_raw(list);
        }
    }
}

/// Free a CGameEntry returned by gamelib_get() or gamelib_entry_list_get().
#[no_mangle]
pub extern "C" fn gamelib_free_entry(entry: *mut CGameEntry) {
    if !entry.is_null() {
        unsafe {
            let e = Box::from_raw(entry);
            free_c_char(e.id);
            free_c_char(e.title);
            free_c_char(e.author);
            free_c_char(e.exe);
            free_c_char(e.icon);
            free_c_char(e.icon_path);
        }
    }
}

// ============================================================================
// Mutations
// ============================================================================

/// Add a game and save the library. `icon` may be null.
/// Returns the new entry id, or null on error.
/// Caller MUST call gamelib_free_string() when done.
#[no_mangle]
pub extern "C" fn gamelib_add(
    handle: *mut CCollection,
    title: *const c_char,
    author: *const c_char,
    exe: *const c_char,
    icon: *const c_char,
) -> *mut c_char {
    let Some(handle) = (unsafe { handle.as_mut() }) else {
        return ptr::null_mut();
    };
    let Some(details) = (unsafe { details_arg(title, author, exe, icon) }) else {
        return ptr::null_mut();
    };

    let result = GameEntry::from_details(details).and_then(|entry| handle.collection.add(entry));
    match result {
        Ok(id) => string_to_c_char(&id.to_string()),
        Err(e) => {
            tracing::error!("Error adding game: {}", e);
            ptr::null_mut()
        }
    }
}

/// Replace the fields of an existing game and save the library. `icon` may be null.
#[no_mangle]
pub extern "C" fn gamelib_edit(
    handle: *mut CCollection,
    id: *const c_char,
    title: *const c_char,
    author: *const c_char,
    exe: *const c_char,
    icon: *const c_char,
) -> c_int {
    let Some(handle) = (unsafe { handle.as_mut() }) else {
        return CResultCode::InvalidArgument as c_int;
    };
    let (Some(id), Some(details)) = (unsafe { id_arg(id) }, unsafe {
        details_arg(title, author, exe, icon)
    }) else {
        return CResultCode::InvalidArgument as c_int;
    };

    match handle.collection.edit(id, details) {
        Ok(()) => CResultCode::Success as c_int,
        Err(e) => error_code("editing game", e),
    }
}

/// Remove a game by id and save the library. Removing an unknown id
/// succeeds without changing anything.
#[no_mangle]
pub extern "C" fn gamelib_remove(handle: *mut CCollection, id: *const c_char) -> c_int {
    let Some(handle) = (unsafe { handle.as_mut() }) else {
        return CResultCode::InvalidArgument as c_int;
    };
    let Some(id) = (unsafe { id_arg(id) }) else {
        return CResultCode::InvalidArgument as c_int;
    };

    match handle.collection.remove(id) {
        Ok(_) => CResultCode::Success as c_int,
        Err(e) => error_code("removing game", e),
    }
}

// ============================================================================
// OS Integration
// ============================================================================

/// Start a game's executable without waiting for it.
#[no_mangle]
pub extern "C" fn gamelib_launch(handle: *const CCollection, id: *const c_char) -> c_int {
    let Some(handle) = (unsafe { handle.as_ref() }) else {
        return CResultCode::InvalidArgument as c_int;
    };
    let Some(id) = (unsafe { id_arg(id) }) else {
        return CResultCode::InvalidArgument as c_int;
    };

    match handle.collection.launch(id) {
        Ok(()) => CResultCode::Success as c_int,
        Err(e) => error_code("launching game", e),
    }
}

/// Open the folder containing a game's executable.
#[no_mangle]
pub extern "C" fn gamelib_open_folder(handle: *const CCollection, id: *const c_char) -> c_int {
    let Some(handle) = (unsafe { handle.as_ref() }) else {
        return CResultCode::InvalidArgument as c_int;
    };
    let Some(id) = (unsafe { id_arg(id) }) else {
        return CResultCode::InvalidArgument as c_int;
    };
    let Some(entry) = handle.collection.get(id) else {
        return CResultCode::NotFound as c_int;
    };

    match open_folder(entry) {
        Ok(()) => CResultCode::Success as c_int,
        Err(e) => {
            tracing::error!("Error opening folder: {:#}", e);
            CResultCode::Error as c_int
        }
    }
}

/// Open the library file in the default application for hand editing.
#[no_mangle]
pub extern "C" fn gamelib_open_library_file(handle: *const CCollection) -> c_int {
    let Some(handle) = (unsafe { handle.as_ref() }) else {
        return CResultCode::InvalidArgument as c_int;
    };

    match open_library_file(handle.collection.store()) {
        Ok(()) => CResultCode::Success as c_int,
        Err(e) => {
            tracing::error!("Error opening library file: {:#}", e);
            CResultCode::Error as c_int
        }
    }
}

// ============================================================================
// String Management
// ============================================================================

/// Free a string returned by FFI functions.
#[no_mangle]
pub extern "C" fn gamelib_free_string(s: *mut c_char) {
    free_c_char(s);
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Borrow a C string argument. None for null or invalid UTF-8.
unsafe fn c_str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

unsafe fn id_arg(id: *const c_char) -> Option<EntryId> {
    c_str_arg(id)?.parse().ok()
}

unsafe fn details_arg(
    title: *const c_char,
    author: *const c_char,
    exe: *const c_char,
    icon: *const c_char,
) -> Option<GameDetails> {
    let mut details = GameDetails::new(c_str_arg(title)?, c_str_arg(author)?, c_str_arg(exe)?);
    if !icon.is_null() {
        details = details.with_icon(c_str_arg(icon)?);
    }
    Some(details)
}

fn error_code(action: &str, e: crate::LibraryError) -> c_int {
    tracing::error!("Error {}: {}", action, e);
    match e {
        crate::LibraryError::EntryNotFound(_) => CResultCode::NotFound as c_int,
        crate::LibraryError::InvalidEntry { .. } => CResultCode::InvalidArgument as c_int,
        _ => CResultCode::Error as c_int,
    }
}

fn entry_to_c(entry: &GameEntry) -> *mut CGameEntry {
    let c_entry = Box::new(CGameEntry {
        id: string_to_c_char(&entry.id().to_string()),
        title: string_to_c_char(entry.title()),
        author: string_to_c_char(entry.author()),
        exe: string_to_c_char(&entry.exe().to_string_lossy()),
        icon: resolve_icon(entry)
            .map(|p| string_to_c_char(&p.to_string_lossy()))
            .unwrap_or(ptr::null_mut()),
        icon_path: entry
            .icon()
            .map(|p| string_to_c_char(&p.to_string_lossy()))
            .unwrap_or(ptr::null_mut()),
    });
    Box::into_raw(c_entry)
}

fn string_to_c_char(s: &str) -> *mut c_char {
    let owned;
    let s = if s.contains('\0') {
        owned = s.replace('\0', "");
        owned.as_str()
    } else {
        s
    };

    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn free_c_char(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}
