use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Narrow seam over the external archive tool.
///
/// Exactly one real adapter exists ([`SevenZip`]); everything brittle
/// about shelling out and scanning free-text output stays behind this
/// trait so the traversal engine can be driven by a fake in tests.
pub trait ArchiveTool {
    /// Best-effort type label for `path`, `None` when the file is not an
    /// archive the tool recognizes.
    fn classify(&self, path: &Path) -> Result<Option<String>>;

    /// Unpack `path` into `target`, returning the tool's exit status.
    /// Zero means success; anything else means the archive is corrupt or
    /// password protected and must be treated as recoverable.
    fn extract(&self, path: &Path, target: &Path) -> Result<i32>;
}

static VERSION_BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*7-Zip\S*\s+(?:[\[(]\S+[\])]\s+)?(\d+\.\d+)").unwrap());

static TYPE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^Type = (.+)$").unwrap());

/// Adapter for a 7-Zip style command line tool.
#[derive(Debug)]
pub struct SevenZip {
    bin: PathBuf,
    version: String,
    echo_raw: bool,
}

impl SevenZip {
    /// Resolve `name` and verify it answers with a version banner.
    ///
    /// Names without a path separator are looked up on `PATH`; explicit
    /// paths are taken as given. The tool is invoked once with no
    /// arguments and its output must match the banner pattern, otherwise
    /// the configuration is unusable and the run must not start.
    pub fn discover(name: &str, echo_raw: bool) -> Result<Self> {
        let bin = if name.contains(std::path::MAIN_SEPARATOR) {
            PathBuf::from(name)
        } else {
            which::which(name).map_err(|e| Error::ToolNotFound {
                name: name.to_string(),
                source: e,
            })?
        };

        let output = run(&bin, &[])?;
        let text = combined_text(&output);
        let version = VERSION_BANNER
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| Error::NoVersion { cmd: bin.clone() })?;

        Ok(Self {
            bin,
            version,
            echo_raw,
        })
    }

    /// Version string reported by the tool's banner.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }
}

impl ArchiveTool for SevenZip {
    fn classify(&self, path: &Path) -> Result<Option<String>> {
        let output = run(&self.bin, &[OsStr::new("l"), path.as_os_str()])?;
        let text = combined_text(&output);
        if self.echo_raw {
            eprint!("{text}");
        }

        // When the listing carries several "Type =" lines the labels are
        // concatenated in encounter order. The original matcher behaved
        // this way and downstream skip-list matching depends on the exact
        // label shape, so the aggregation is kept as observed.
        let mut label = String::new();
        for cap in TYPE_LINE.captures_iter(&text) {
            label.push_str(cap[1].trim_end());
        }
        Ok((!label.is_empty()).then_some(label))
    }

    fn extract(&self, path: &Path, target: &Path) -> Result<i32> {
        let mut target_arg = OsString::from("-o");
        target_arg.push(target.as_os_str());

        // -y answers every prompt with yes, -p supplies an empty password;
        // together they guarantee the tool never blocks on a prompt. No
        // timeout is imposed, so a hung tool stalls the whole run.
        let output = run(
            &self.bin,
            &[
                OsStr::new("x"),
                OsStr::new("-y"),
                OsStr::new("-p"),
                &target_arg,
                path.as_os_str(),
            ],
        )?;
        if self.echo_raw {
            eprint!("{}", combined_text(&output));
        }
        Ok(output.status.code().unwrap_or(-1))
    }
}

fn run(bin: &Path, args: &[&OsStr]) -> Result<Output> {
    Command::new(bin)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::Invoke {
            cmd: bin.to_path_buf(),
            source: e,
        })
}

fn combined_text(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}
