use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create scratch directory under '{parent}': {source}")]
    ScratchCreate { parent: PathBuf, source: io::Error },

    #[error("no free scratch name under '{parent}' after {attempts} attempts")]
    ScratchExhausted { parent: PathBuf, attempts: u32 },

    #[error("failed to clear scratch directory '{path}': {source}")]
    ScratchClear { path: PathBuf, source: io::Error },

    #[error("failed to set permissions on '{path}': {source}")]
    Permissions { path: PathBuf, source: io::Error },

    #[error("failed to move '{from}' to '{to}': {source}")]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
