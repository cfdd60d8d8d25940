use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use hashdig_archive::ArchiveTool;
use hashdig_digest::{Algorithm, digest_file};
use hashdig_fs::{ScratchWorkspace, make_tree_accessible, relocate_file};

use crate::config::RunConfig;
use crate::path::{ProcessingRoot, RootKind, logical_path};
use crate::report;
use crate::sink::Sinks;

/// Fixed name nested archives are staged under before extraction, so the
/// external tool never reads from a path a later step deletes.
const STAGING_NAME: &str = "staged.archive";

/// The control-flow hub: walks roots depth-first, hashes eligible files,
/// probes everything for archive status, and turns each successful
/// extraction into a new processing root.
///
/// Fatal errors propagate out of [`Engine::run`]; recoverable conditions
/// (unreadable entries, corrupt archives) are reported and absorbed here.
pub struct Engine<'a> {
    config: &'a RunConfig,
    tool: &'a dyn ArchiveTool,
    sinks: &'a mut Sinks,
    scratch: &'a mut ScratchWorkspace,
}

impl<'a> Engine<'a> {
    pub fn new(
        config: &'a RunConfig,
        tool: &'a dyn ArchiveTool,
        sinks: &'a mut Sinks,
        scratch: &'a mut ScratchWorkspace,
    ) -> Self {
        Self {
            config,
            tool,
            sinks,
            scratch,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let meta = fs::metadata(&self.config.input).with_context(|| {
            format!("cannot read input path '{}'", self.config.input.display())
        })?;
        let kind = if meta.is_dir() {
            RootKind::Directory
        } else {
            RootKind::SingleFile
        };

        self.scratch
            .reset_for_new_root()
            .context("cannot clear scratch workspace")?;

        let root = ProcessingRoot::new(self.config.input.clone(), kind);
        self.process_root(&root)?;

        self.sinks.flush().context("cannot flush output files")
    }

    fn process_root(&mut self, root: &ProcessingRoot) -> Result<()> {
        match root.kind {
            RootKind::SingleFile => self.process_file(&root.path, root),
            RootKind::Directory | RootKind::ExtractedArchive => self.walk_dir(&root.path, root),
        }
    }

    /// Listing order is filesystem-defined; nothing is sorted.
    fn walk_dir(&mut self, dir: &Path, root: &ProcessingRoot) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                report::warn(format!("cannot list '{}': {e}", dir.display()));
                return Ok(());
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report::warn(format!("unreadable entry under '{}': {e}", dir.display()));
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    report::warn(format!("cannot stat '{}': {e}", path.display()));
                    continue;
                }
            };

            if file_type.is_symlink() {
                // never followed, never reported
                continue;
            }
            if file_type.is_dir() {
                self.walk_dir(&path, root)?;
            } else if file_type.is_file() {
                self.process_file(&path, root)?;
            } else {
                report::warn(format!("unsupported entry type: '{}'", path.display()));
            }
        }
        Ok(())
    }

    fn process_file(&mut self, path: &Path, root: &ProcessingRoot) -> Result<()> {
        let logical = logical_path(path, root);
        println!("{logical}");

        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                report::warn(format!("cannot stat '{logical}': {e}"));
                return Ok(());
            }
        };

        if size >= self.config.min_filesize && self.sinks.any() {
            self.hash_file(path, &logical, size)?;
        } else if self.config.verbose && self.sinks.any() {
            report::note(format!("below size threshold, not hashing: {logical}"));
        }

        // Archive status is probed regardless of the size rule.
        let label = self
            .tool
            .classify(path)
            .with_context(|| format!("archive classification failed for '{logical}'"))?;
        if let Some(label) = label {
            if self.config.skips_archive(&label) {
                report::note(format!("skip-listed archive type '{label}': {logical}"));
                return Ok(());
            }
            self.extract_and_recurse(path, &logical, &label, root)?;
        }
        Ok(())
    }

    /// Hash once per algorithm per file; sinks that need the same
    /// algorithm share the result within this step.
    fn hash_file(&mut self, path: &Path, logical: &str, size: u64) -> Result<()> {
        let mut step = HashStep::new(path);

        if let Some(sink) = self.sinks.md5.as_mut() {
            let md5 = step.get(Algorithm::Md5)?;
            sink.write_record(&md5, logical)
                .context("cannot write md5sum record")?;
        }
        if let Some(sink) = self.sinks.sha1.as_mut() {
            let sha1 = step.get(Algorithm::Sha1)?;
            sink.write_record(&sha1, logical)
                .context("cannot write sha1sum record")?;
        }
        if let Some(sink) = self.sinks.rds.as_mut() {
            let sha1 = step.get(Algorithm::Sha1)?;
            let md5 = step.get(Algorithm::Md5)?;
            let crc32 = step.get(Algorithm::Crc32)?;
            sink.write_record(&sha1, &md5, &crc32, logical, size)
                .context("cannot write RDS record")?;
        }
        Ok(())
    }

    fn extract_and_recurse(
        &mut self,
        path: &Path,
        logical: &str,
        label: &str,
        root: &ProcessingRoot,
    ) -> Result<()> {
        let mut source = path.to_path_buf();
        let mut staged = false;

        // A file inside an extracted tree gets moved out of that tree
        // before its own extraction starts; otherwise the tool could read
        // from a path the next step deletes.
        if root.kind == RootKind::ExtractedArchive {
            let staging = self.scratch.path().join(STAGING_NAME);
            relocate_file(path, &staging)
                .with_context(|| format!("cannot stage nested archive '{logical}'"))?;
            source = staging;
            staged = true;
        }

        let target = self.scratch.path().join(logical);
        fs::create_dir_all(&target)
            .with_context(|| format!("cannot create extraction target for '{logical}'"))?;

        if self.config.verbose {
            report::note(format!("extracting {label} archive: {logical}"));
        }
        let status = self
            .tool
            .extract(&source, &target)
            .with_context(|| format!("archive extraction did not start for '{logical}'"))?;
        if status != 0 {
            report::warn(format!(
                "archive is corrupt or password protected (status {status}): {logical}"
            ));
            let _ = fs::remove_dir_all(&target);
            if staged {
                let _ = fs::remove_file(&source);
            }
            return Ok(());
        }

        make_tree_accessible(&target)
            .with_context(|| format!("cannot open up extracted tree for '{logical}'"))?;
        if staged {
            fs::remove_file(&source)
                .with_context(|| format!("cannot delete staged archive for '{logical}'"))?;
        }

        let child = ProcessingRoot::new(target, RootKind::ExtractedArchive);
        self.process_root(&child)?;

        // The root is done; drop its tree so a later sibling extraction
        // mapping to the same logical path starts from an empty target.
        let _ = fs::remove_dir_all(&child.path);
        Ok(())
    }
}

/// Digest cache for a single file's hashing step. Nothing survives past
/// the step; separate files never share digests.
struct HashStep<'p> {
    path: &'p Path,
    md5: Option<String>,
    sha1: Option<String>,
    crc32: Option<String>,
}

impl<'p> HashStep<'p> {
    fn new(path: &'p Path) -> Self {
        Self {
            path,
            md5: None,
            sha1: None,
            crc32: None,
        }
    }

    fn get(&mut self, algorithm: Algorithm) -> Result<String> {
        let slot = match algorithm {
            Algorithm::Md5 => &mut self.md5,
            Algorithm::Sha1 => &mut self.sha1,
            Algorithm::Crc32 => &mut self.crc32,
        };
        if let Some(hex) = slot {
            return Ok(hex.clone());
        }
        let hex = digest_file(self.path, algorithm).with_context(|| {
            format!(
                "{} digest failed for '{}'",
                algorithm.name(),
                self.path.display()
            )
        })?;
        *slot = Some(hex.clone());
        Ok(hex)
    }
}
