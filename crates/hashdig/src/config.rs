use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};

use crate::cli::App;

/// Per-sink settings: where to write, and whether records carry the full
/// logical path or just the short name.
#[derive(Clone, Debug, Default)]
pub struct SinkOptions {
    pub path: Option<PathBuf>,
    pub full_path: bool,
}

/// Everything a run needs, collected once at startup and threaded through
/// the engine; there are no process-wide globals.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub input: PathBuf,
    pub md5: SinkOptions,
    pub sha1: SinkOptions,
    pub rds: SinkOptions,
    pub archive_bin: String,
    pub archive_skip: Vec<String>,
    pub min_filesize: u64,
    pub tmp_root: PathBuf,
    pub verbose: bool,
    pub debug: bool,
}

impl RunConfig {
    pub fn from_args(app: App) -> Result<Self> {
        let meta = std::fs::metadata(&app.input)
            .with_context(|| format!("cannot read input path '{}'", app.input.display()))?;
        ensure!(
            meta.is_file() || meta.is_dir(),
            "input path '{}' is neither a file nor a directory",
            app.input.display()
        );

        Ok(Self {
            input: app.input,
            md5: SinkOptions {
                path: app.md5sum_file,
                full_path: app.md5sum_fullpath,
            },
            sha1: SinkOptions {
                path: app.sha1sum_file,
                full_path: app.sha1sum_fullpath,
            },
            rds: SinkOptions {
                path: app.rds_file,
                full_path: app.rds_fullpath,
            },
            archive_bin: app.archive_bin,
            archive_skip: app.archive_skip,
            min_filesize: app.min_filesize,
            tmp_root: app.tmp.unwrap_or_else(env::temp_dir),
            verbose: app.verbose,
            debug: app.debug,
        })
    }

    /// Case-insensitive exact match against the configured skip-list.
    pub fn skips_archive(&self, label: &str) -> bool {
        self.archive_skip
            .iter()
            .any(|s| s.eq_ignore_ascii_case(label))
    }
}
