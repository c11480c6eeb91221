//! File mutation operations for ie: recursive delete and rename.
//!
//! Both act on absolute paths built from a buffer directory and an entry name.
//! Failures come back as typed [IeError]s so the session can report them and carry on.

use crate::error::{IeError, Result};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Removes `path`. Directories are emptied depth-first and then removed.
///
/// Symlinks are removed as links, never followed.
pub fn remove_recursive(path: &Path) -> Result<()> {
    let remove_err = |source: io::Error| IeError::Remove {
        path: path.to_path_buf(),
        source,
    };

    let md = fs::symlink_metadata(path).map_err(remove_err)?;
    if !md.is_dir() {
        fs::remove_file(path).map_err(remove_err)?;
        tracing::debug!(path = %path.display(), "removed file");
        return Ok(());
    }

    for child in fs::read_dir(path).map_err(remove_err)? {
        let child = child.map_err(remove_err)?;
        remove_recursive(&child.path())?;
    }

    fs::remove_dir(path).map_err(remove_err)?;
    tracing::debug!(path = %path.display(), "removed directory");
    Ok(())
}

/// Removes every name in `names` from `dir`, stopping at the first failure.
///
/// Returns the number of targets removed.
pub fn remove_all(dir: &Path, names: &[String]) -> Result<usize> {
    for (done, name) in names.iter().enumerate() {
        if let Err(e) = remove_recursive(&dir.join(name)) {
            tracing::warn!(error = %e, removed = done, "delete stopped");
            return Err(e);
        }
    }
    tracing::info!(dir = %dir.display(), count = names.len(), "deleted targets");
    Ok(names.len())
}

/// Renames `from` to `to` inside `dir`. An existing `to` is refused rather than replaced.
pub fn rename_entry(dir: &Path, from: &str, to: &str) -> Result<PathBuf> {
    let src = dir.join(from);
    let dest = dir.join(to);

    if fs::symlink_metadata(&dest).is_ok() {
        return Err(IeError::RenameTarget { to: dest });
    }

    fs::rename(&src, &dest).map_err(|source| IeError::Rename {
        from: src.clone(),
        to: dest.clone(),
        source,
    })?;
    tracing::info!(from = %src.display(), to = %dest.display(), "renamed");
    Ok(dest)
}
