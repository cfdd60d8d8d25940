use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::RunConfig;
use crate::path::short_name;

/// Fixed first line of the reference data set format.
pub const RDS_HEADER: &str =
    r#""SHA-1","MD5","CRC32","FileName","FileSize","ProductCode","OpSystemCode","SpecialCode""#;

/// Append-only writer for one md5sum/sha1sum-style digest list.
pub struct DigestListSink {
    writer: BufWriter<File>,
    full_path: bool,
}

impl DigestListSink {
    pub fn open(path: &Path, full_path: bool) -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            full_path,
        })
    }

    /// One line per file: digest, two spaces, display name.
    pub fn write_record(&mut self, digest: &str, logical: &str) -> io::Result<()> {
        let name = if self.full_path {
            logical
        } else {
            short_name(logical)
        };
        writeln!(self.writer, "{digest}  {name}")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Append-only writer for the RDS CSV format. All three digests must be
/// present in every record.
pub struct RdsSink {
    writer: BufWriter<File>,
    full_path: bool,
}

impl RdsSink {
    pub fn open(path: &Path, full_path: bool) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{RDS_HEADER}")?;
        Ok(Self { writer, full_path })
    }

    pub fn write_record(
        &mut self,
        sha1: &str,
        md5: &str,
        crc32: &str,
        logical: &str,
        size: u64,
    ) -> io::Result<()> {
        let name = if self.full_path {
            logical
        } else {
            short_name(logical)
        };
        writeln!(
            self.writer,
            r#""{sha1}","{md5}","{crc32}","{name}",{size},0,"WIN","""#
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// The set of sinks enabled for a run, opened once before traversal
/// begins and flushed at run end.
#[derive(Default)]
pub struct Sinks {
    pub md5: Option<DigestListSink>,
    pub sha1: Option<DigestListSink>,
    pub rds: Option<RdsSink>,
}

impl Sinks {
    pub fn open(config: &RunConfig) -> io::Result<Self> {
        let mut sinks = Self::default();
        if let Some(path) = &config.md5.path {
            sinks.md5 = Some(DigestListSink::open(path, config.md5.full_path)?);
        }
        if let Some(path) = &config.sha1.path {
            sinks.sha1 = Some(DigestListSink::open(path, config.sha1.full_path)?);
        }
        if let Some(path) = &config.rds.path {
            sinks.rds = Some(RdsSink::open(path, config.rds.full_path)?);
        }
        Ok(sinks)
    }

    pub fn any(&self) -> bool {
        self.md5.is_some() || self.sha1.is_some() || self.rds.is_some()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(sink) = self.md5.as_mut() {
            sink.flush()?;
        }
        if let Some(sink) = self.sha1.as_mut() {
            sink.flush()?;
        }
        if let Some(sink) = self.rds.as_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}
