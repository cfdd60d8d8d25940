use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("digest of '{path}' came back empty")]
    Empty { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, DigestError>;
