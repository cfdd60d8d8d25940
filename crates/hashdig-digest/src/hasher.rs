use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use digest::Digest;
use md5::Md5;
use sha1::Sha1;

use crate::error::{DigestError, Result};

/// The digest algorithms a hash database line can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha1,
    Crc32,
}

impl Algorithm {
    /// Length of the lowercase hex encoding this algorithm produces.
    pub fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Crc32 => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Crc32 => "crc32",
        }
    }
}

/// Stream `path` once and return the lowercase hex digest.
///
/// The file is never buffered whole; reads go through an 8 KiB window.
pub fn digest_file(path: &Path, algorithm: Algorithm) -> Result<String> {
    let file = File::open(path).map_err(|e| DigestError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let hex = match algorithm {
        Algorithm::Md5 => stream_digest::<Md5>(reader, path)?,
        Algorithm::Sha1 => stream_digest::<Sha1>(reader, path)?,
        Algorithm::Crc32 => stream_crc32(reader, path)?,
    };

    if hex.is_empty() {
        return Err(DigestError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(hex)
}

fn stream_digest<D: Digest>(mut reader: impl Read, path: &Path) -> Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer).map_err(|e| DigestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

fn stream_crc32(mut reader: impl Read, path: &Path) -> Result<String> {
    let mut hasher = crc32fast::Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer).map_err(|e| DigestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:08x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn md5_known_value() {
        let f = temp_file(b"hello world");
        let hex = digest_file(f.path(), Algorithm::Md5).unwrap();
        assert_eq!(hex, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn sha1_known_value() {
        let f = temp_file(b"hello world");
        let hex = digest_file(f.path(), Algorithm::Sha1).unwrap();
        assert_eq!(hex, "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
    }

    #[test]
    fn crc32_known_value() {
        let f = temp_file(b"hello world");
        let hex = digest_file(f.path(), Algorithm::Crc32).unwrap();
        assert_eq!(hex, "0d4a1185");
    }

    #[test]
    fn empty_file_still_digests() {
        let f = temp_file(b"");
        let md5 = digest_file(f.path(), Algorithm::Md5).unwrap();
        let sha1 = digest_file(f.path(), Algorithm::Sha1).unwrap();
        let crc = digest_file(f.path(), Algorithm::Crc32).unwrap();
        assert_eq!(md5, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(crc, "00000000");
    }

    #[test]
    fn hex_lengths_match_algorithm() {
        let f = temp_file(b"abc");
        for algo in [Algorithm::Md5, Algorithm::Sha1, Algorithm::Crc32] {
            let hex = digest_file(f.path(), algo).unwrap();
            assert_eq!(hex.len(), algo.hex_len());
            assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
            assert_eq!(hex, hex.to_lowercase());
        }
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = digest_file(Path::new("/nonexistent/hashdig-test"), Algorithm::Md5).unwrap_err();
        assert!(matches!(err, DigestError::Read { .. }));
    }
}
