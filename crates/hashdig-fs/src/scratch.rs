use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::{Error, Result};

/// Prefix for scratch directory names, kept short so extraction target
/// paths stay well under platform limits even for deeply nested archives.
const SCRATCH_PREFIX: &str = "hd";

const CREATE_ATTEMPTS: u32 = 16;

/// The single ephemeral directory tree used to stage all archive
/// extractions for one run.
///
/// Created once, cleared before each new top-level processing root so a
/// prior root's extraction targets cannot leak into the current one, and
/// removed on drop regardless of how the run ends.
pub struct ScratchWorkspace {
    root: PathBuf,
    generation: u64,
}

impl ScratchWorkspace {
    /// Pick a unique scratch path under `parent` and create it.
    ///
    /// The suffix is a plain random six-digit number; uniqueness comes
    /// from `create_dir` failing on collision, not from the generator.
    pub fn init(parent: &Path) -> Result<Self> {
        let mut rng = rand::thread_rng();
        for _ in 0..CREATE_ATTEMPTS {
            let candidate = parent.join(format!("{SCRATCH_PREFIX}{:06}", rng.gen_range(0..1_000_000u32)));
            match fs::create_dir(&candidate) {
                Ok(()) => {
                    return Ok(Self {
                        root: candidate,
                        generation: 0,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(Error::ScratchCreate {
                        parent: parent.to_path_buf(),
                        source: e,
                    });
                }
            }
        }
        Err(Error::ScratchExhausted {
            parent: parent.to_path_buf(),
            attempts: CREATE_ATTEMPTS,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Count of `reset_for_new_root` calls so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clear (but keep) the scratch root before a new top-level root is
    /// traversed under it.
    pub fn reset_for_new_root(&mut self) -> Result<()> {
        clear_dir(&self.root).map_err(|e| Error::ScratchClear {
            path: self.root.clone(),
            source: e,
        })?;
        self.generation += 1;
        Ok(())
    }

    /// Remove the scratch root now instead of waiting for drop.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if self.root.exists() {
            let _ = fs::remove_dir_all(&self.root);
        }
    }
}

fn clear_dir(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
