//! Avatar image blob cache.
//!
//! # Responsibility
//! - Persist the single user avatar under a fixed file name in the
//!   app-provided documents directory.
//! - Load it back at startup.
//!
//! # Invariants
//! - Overwrites are atomic: write to a temp file, then rename.
//! - A missing avatar reads as `None`, not an error.

use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const AVATAR_FILE_NAME: &str = "avatar.jpg";
const AVATAR_TEMP_FILE_NAME: &str = "avatar.jpg.tmp";

/// Saves the avatar blob, replacing any previous one.
///
/// Returns the final file path.
pub fn save_avatar(dir: &Path, bytes: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let temp_path = dir.join(AVATAR_TEMP_FILE_NAME);
    let final_path = dir.join(AVATAR_FILE_NAME);

    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, &final_path)?;
    info!(
        "event=avatar_save module=avatar status=ok size_bytes={}",
        bytes.len()
    );
    Ok(final_path)
}

/// Loads the cached avatar blob, if one was ever saved.
pub fn load_avatar(dir: &Path) -> io::Result<Option<Vec<u8>>> {
    let path = dir.join(AVATAR_FILE_NAME);
    match fs::read(&path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
