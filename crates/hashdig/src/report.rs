use std::fmt::Display;

use console::style;

/// Recoverable condition: the entry is skipped, the run continues.
pub fn warn(msg: impl Display) {
    eprintln!("{} {msg}", style("warning:").yellow().bold());
}

/// Fatal condition: printed once at top level before a non-zero exit.
pub fn error(msg: impl Display) {
    eprintln!("{} {msg}", style("error:").red().bold());
}

/// Verbose per-step detail.
pub fn note(msg: impl Display) {
    eprintln!("{msg}");
}
