//! Importing audio files into the managed storage directory.
//!
//! Sessions always point at the stored copy, so a session keeps working after
//! the original file is moved or deleted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Whether a file with `source`'s name is already stored in `dest_dir`.
pub fn file_exists(source: &Path, dest_dir: &Path) -> bool {
    source
        .file_name()
        .map(|name| dest_dir.join(name).is_file())
        .unwrap_or(false)
}

/// Copy `source` into `dest_dir`, creating the directory if needed.
///
/// Returns the stored path, or `None` when a same-named file is already there
/// and nothing was copied.
pub fn copy_file(source: &Path, dest_dir: &Path) -> io::Result<Option<PathBuf>> {
    let Some(name) = source.file_name() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", source.display()),
        ));
    };

    if file_exists(source, dest_dir) {
        return Ok(None);
    }

    fs::create_dir_all(dest_dir)?;
    let destination = dest_dir.join(name);
    fs::copy(source, &destination)?;
    Ok(Some(destination))
}
