use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive tool '{name}' not found: {source}")]
    ToolNotFound {
        name: String,
        source: which::Error,
    },

    #[error("failed to invoke '{cmd}': {source}")]
    Invoke { cmd: PathBuf, source: io::Error },

    #[error("'{cmd}' printed no recognizable version banner")]
    NoVersion { cmd: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;
