use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Recursively grant read and traverse access on an extracted tree.
///
/// Archives preserve whatever modes their entries carried; an entry
/// extracted as `0o000` would make every later step (hashing, probing,
/// recursing) fail. Directories get `0o755`, files `0o644` plus the
/// execute bits the entry already had. Symlinks are left alone.
pub fn make_tree_accessible(root: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(root).map_err(|e| Error::Permissions {
        path: root.to_path_buf(),
        source: e,
    })?;
    if meta.file_type().is_symlink() {
        return Ok(());
    }

    apply_accessible(root, meta.is_dir())?;

    if meta.is_dir() {
        let entries = fs::read_dir(root).map_err(|e| Error::Permissions {
            path: root.to_path_buf(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::Permissions {
                path: root.to_path_buf(),
                source: e,
            })?;
            make_tree_accessible(&entry.path())?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn apply_accessible(path: &Path, is_dir: bool) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let current = fs::symlink_metadata(path)
        .map_err(|e| Error::Permissions {
            path: path.to_path_buf(),
            source: e,
        })?
        .permissions()
        .mode();
    let mode = if is_dir {
        0o755
    } else {
        0o644 | (current & 0o111)
    };
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| Error::Permissions {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(not(unix))]
fn apply_accessible(path: &Path, _is_dir: bool) -> Result<()> {
    let mut perms = fs::metadata(path)
        .map_err(|e| Error::Permissions {
            path: path.to_path_buf(),
            source: e,
        })?
        .permissions();
    perms.set_readonly(false);
    fs::set_permissions(path, perms).map_err(|e| Error::Permissions {
        path: path.to_path_buf(),
        source: e,
    })
}
