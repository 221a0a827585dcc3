//! Operations that hand a game entry to the operating system.
//!
//! - Launch: start the game's executable as a detached process
//! - Open folder: show the game's install folder in the file manager
//! - Open library file: open the library JSON in the default editor
//!
//! None of these track what happens after the OS accepts the request.

use crate::{GameEntry, LibraryStore};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Start the game's executable and return immediately.
/// The child process is not tracked; only a failure to spawn is reported.
/// On Unix the child is never waited on, so an exited game stays a zombie
/// process until the launcher itself exits.
pub fn launch(entry: &GameEntry) -> Result<()> {
    let mut cmd = build_launch_command(entry);

    tracing::info!("Launching {}: {:?}", entry.title(), cmd);

    cmd.spawn()
        .with_context(|| format!("Failed to start {:?}", entry.exe()))?;

    Ok(())
}

/// The folder containing the game's executable, if the path has one.
pub fn game_folder(entry: &GameEntry) -> Option<PathBuf> {
    entry
        .exe()
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
}

/// Open the folder containing the game's executable.
pub fn open_folder(entry: &GameEntry) -> Result<()> {
    let folder = game_folder(entry)
        .context(format!("No install folder for {:?}", entry.exe()))?;

    if !folder.is_dir() {
        anyhow::bail!("Install folder not found: {:?}", folder);
    }

    open::that(&folder).context(format!("Failed to open folder: {:?}", folder))?;
    Ok(())
}

/// Open the library file itself in the platform's default application.
pub fn open_library_file(store: &LibraryStore) -> Result<()> {
    let path = store.path();

    if !path.exists() {
        anyhow::bail!("library file not found: {:?}", path);
    }

    open::that(path).context(format!("Failed to open library file: {:?}", path))?;
    Ok(())
}

fn build_launch_command(entry: &GameEntry) -> Command {
    let mut cmd = Command::new(entry.exe());

    // Games tend to load assets relative to their own folder
    if let Some(folder) = game_folder(entry).filter(|f| f.is_dir()) {
        cmd.current_dir(folder);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}
