//! GameLib Core Library
//!
//! Core of a desktop launcher for a personal collection of locally installed games.
//!
//! # Architecture
//!
//! This library is designed to be consumed via FFI by native UI frontends:
//! - **macOS**: SwiftUI app using static lib via Swift ↔ Rust FFI
//! - **Windows**: WPF app using DLL via C# ↔ Rust P/Invoke
//!
//! The frontend owns all presentation. This crate owns the game list and its
//! storage, and talks to the OS when a game is launched.
//!
//! ## Storage (`store` module)
//! - `LibraryStore::load()` - Read `library.json`, degrading to an empty library
//! - `LibraryStore::save()` - Overwrite `library.json` with the full list
//!
//! ## Session State (`collection` module)
//! - `Collection::initialize()` - Load once at startup
//! - `add()`, `remove()`, `edit()` - Mutate and save immediately
//! - `find()` - Case-insensitive search over title and author
//! - `launch()` - Start a game's executable, fire-and-forget
//!
//! ## OS Integration (`operations`, `icons` modules)
//! - Launching, opening the install folder, opening the library file
//! - Icon path resolution and loading
//!
//! ## Data Structures (`game` module)
//! - `GameEntry` - One game (id, title, author, exe, optional icon)
//! - `GameDetails` - The editable fields, as entered by the user
//! - `EntryId` - Stable identifier assigned on creation

pub mod collection;
pub mod error;
pub mod ffi;
pub mod game;
pub mod icons;
pub mod operations;
pub mod store;

pub use collection::{Collection, Matches};
pub use error::{LibraryError, Result};
pub use game::{EntryId, GameDetails, GameEntry};
pub use store::{LibraryStore, LoadStatus, LoadedLibrary, LIBRARY_FILE};
