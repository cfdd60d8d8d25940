use std::path::PathBuf;

use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(
    name = "hashdig",
    version = env!("CARGO_PKG_VERSION"),
    about = "Recursively hash files into hash database files, extracting archives along the way",
    long_about = None
)]
pub struct App {
    /// File or directory to process
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write an md5sum-style digest list to this file
    #[arg(long, value_name = "PATH")]
    pub md5sum_file: Option<PathBuf>,

    /// Use the full logical path instead of the short name in the md5sum list
    #[arg(long)]
    pub md5sum_fullpath: bool,

    /// Write a sha1sum-style digest list to this file
    #[arg(long, value_name = "PATH")]
    pub sha1sum_file: Option<PathBuf>,

    /// Use the full logical path instead of the short name in the sha1sum list
    #[arg(long)]
    pub sha1sum_fullpath: bool,

    /// Write an NSRL reference data set CSV to this file
    #[arg(long, value_name = "PATH")]
    pub rds_file: Option<PathBuf>,

    /// Use the full logical path instead of the short name in the RDS CSV
    #[arg(long)]
    pub rds_fullpath: bool,

    /// External archive tool to invoke for classification and extraction
    #[arg(long, value_name = "PATH", default_value = "7z")]
    pub archive_bin: String,

    /// Comma-separated archive type labels to never extract
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub archive_skip: Vec<String>,

    /// Minimum file size in bytes for hashing; smaller files are still probed for archive status
    #[arg(long, value_name = "BYTES", default_value_t = 1)]
    pub min_filesize: u64,

    /// Parent directory for the scratch workspace
    #[arg(long, value_name = "DIR")]
    pub tmp: Option<PathBuf>,

    /// Echo per-step detail
    #[arg(short, long)]
    pub verbose: bool,

    /// Additionally echo raw external tool output
    #[arg(short, long)]
    pub debug: bool,

    /// Print the full manual page and exit
    #[arg(long)]
    pub man: bool,
}
