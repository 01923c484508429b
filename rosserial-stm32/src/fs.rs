//! Filesystem helpers for staging and relocation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Recursively copies `src` into `dst`, creating `dst` and its parents.
///
/// Symlinks are followed, so the destination receives regular files.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;
    let entries = fs::read_dir(src).map_err(|e| Error::io(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_dir_all(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| Error::io(&from, e))?;
            debug!("Copied {}", to.display());
        }
    }
    Ok(())
}

/// Lists regular files directly inside `dir` whose name ends in `.{extension}`.
///
/// Subdirectories are not searched. The result is sorted.
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{extension}");
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(&suffix))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Moves `file` into `dest_dir`, replacing a file of the same name.
///
/// Falls back to copy and delete when a rename crosses filesystems.
pub fn move_into(file: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let name = file
        .file_name()
        .ok_or_else(|| Error::io(file, ErrorKind::InvalidInput.into()))?;
    let target = dest_dir.join(name);
    match fs::rename(file, &target) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            fs::copy(file, &target).map_err(|e| Error::io(file, e))?;
            fs::remove_file(file).map_err(|e| Error::io(file, e))?;
        }
        Err(e) => return Err(Error::io(file, e)),
    }
    debug!("Moved {} to {}", file.display(), target.display());
    Ok(target)
}

/// Creates `dir` whose parent must already exist. An existing `dir` is fine.
pub fn create_dir_in_existing(dir: &Path) -> Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(Error::io(dir, e)),
    }
}
