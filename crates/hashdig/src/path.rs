use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// How logical paths are derived for files found under a root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootKind {
    SingleFile,
    Directory,
    ExtractedArchive,
}

/// Origin context for a traversal: the user-supplied input path, or a
/// staged extraction directory inside the scratch workspace.
#[derive(Clone, Debug)]
pub struct ProcessingRoot {
    pub path: PathBuf,
    pub kind: RootKind,
}

impl ProcessingRoot {
    pub fn new(path: PathBuf, kind: RootKind) -> Self {
        Self { path, kind }
    }
}

/// Derive the stable root-relative path used in every output record.
///
/// Control characters are escaped before any prefix stripping so
/// non-printable bytes never reach output files or the terminal. The
/// input-root prefix is stripped case-insensitively; an extraction root's
/// prefix (which lives under the scratch workspace) is stripped as-is.
pub fn logical_path(abs: &Path, root: &ProcessingRoot) -> String {
    match root.kind {
        RootKind::SingleFile => {
            let name = abs
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            escape_control(&name)
        }
        RootKind::Directory => {
            let full = escape_control(&abs.to_string_lossy());
            let prefix = escape_control(&root.path.to_string_lossy());
            strip_leading_separator(strip_prefix_ignore_case(&full, &prefix)).to_string()
        }
        RootKind::ExtractedArchive => {
            let full = escape_control(&abs.to_string_lossy());
            let prefix = escape_control(&root.path.to_string_lossy());
            strip_leading_separator(full.strip_prefix(&prefix).unwrap_or(&full)).to_string()
        }
    }
}

/// Replace every control character (0–31) with its `\xNN` escape form.
pub fn escape_control(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if (c as u32) < 0x20 {
            out.push_str(&format!("\\x{:02x}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

/// The display name used when full-path mode is not requested.
pub fn short_name(logical: &str) -> &str {
    logical.rsplit(MAIN_SEPARATOR).next().unwrap_or(logical)
}

fn strip_leading_separator(s: &str) -> &str {
    s.strip_prefix(MAIN_SEPARATOR).unwrap_or(s)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> &'a str {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &s[prefix.len()..],
        _ => s,
    }
}
