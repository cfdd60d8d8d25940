//! Scratch workspace lifecycle and the filesystem helpers the traversal
//! engine leans on between extraction steps.

pub use error::{Error, Result};
pub use permissions::make_tree_accessible;
pub use scratch::ScratchWorkspace;

mod error;
mod permissions;
mod scratch;

use std::fs;
use std::path::Path;

/// Move `from` to `to`, falling back to copy-then-delete when the rename
/// crosses a filesystem boundary (the scratch root may live on a
/// different mount than the input tree).
pub fn relocate_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| Error::Relocate {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source: e,
            })?;
        }
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)
                .and_then(|_| fs::remove_file(from))
                .map_err(|e| Error::Relocate {
                    from: from.to_path_buf(),
                    to: to.to_path_buf(),
                    source: e,
                })?;
            Ok(())
        }
    }
}
