//! End-to-end pipeline tests driven by a fake archive tool, so no
//! external binary is needed. Fake archives are text manifests with one
//! `<name>=<hex content>` line per entry; anything with a `.zip`
//! extension classifies as type `Zip`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use hashdig::config::{RunConfig, SinkOptions};
use hashdig::engine::Engine;
use hashdig::sink::{RDS_HEADER, Sinks};
use hashdig_archive::ArchiveTool;
use hashdig_fs::ScratchWorkspace;

#[derive(Debug, PartialEq, Eq)]
enum Call {
    Classify(PathBuf),
    Extract { target: PathBuf },
}

#[derive(Default)]
struct FakeTool {
    calls: Mutex<Vec<Call>>,
}

impl FakeTool {
    fn extract_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, Call::Extract { .. }))
            .count()
    }

    fn classified(&self, name: &str) -> bool {
        self.calls.lock().unwrap().iter().any(
            |c| matches!(c, Call::Classify(p) if p.file_name().is_some_and(|n| n == name)),
        )
    }
}

impl ArchiveTool for FakeTool {
    fn classify(&self, path: &Path) -> hashdig_archive::Result<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Classify(path.to_path_buf()));
        if path.extension().and_then(|e| e.to_str()) == Some("zip") {
            Ok(Some("Zip".to_string()))
        } else {
            Ok(None)
        }
    }

    fn extract(&self, path: &Path, target: &Path) -> hashdig_archive::Result<i32> {
        self.calls.lock().unwrap().push(Call::Extract {
            target: target.to_path_buf(),
        });
        let data = fs::read_to_string(path).unwrap_or_default();
        if data.is_empty() || data.starts_with("CORRUPT") {
            return Ok(2);
        }
        for line in data.lines() {
            let Some((name, hex_content)) = line.split_once('=') else {
                return Ok(2);
            };
            let Ok(content) = hex::decode(hex_content) else {
                return Ok(2);
            };
            let dest = target.join(name);
            if let Some(parent) = dest.parent() {
                let _ = fs::create_dir_all(parent);
            }
            fs::write(dest, content).unwrap();
        }
        Ok(0)
    }
}

fn manifest(entries: &[(&str, &[u8])]) -> String {
    entries
        .iter()
        .map(|(name, content)| format!("{name}={}\n", hex::encode(content)))
        .collect()
}

fn base_config(input: PathBuf, tmp: &Path) -> RunConfig {
    RunConfig {
        input,
        md5: SinkOptions::default(),
        sha1: SinkOptions::default(),
        rds: SinkOptions::default(),
        archive_bin: "unused".into(),
        archive_skip: Vec::new(),
        min_filesize: 1,
        tmp_root: tmp.to_path_buf(),
        verbose: false,
        debug: false,
    }
}

fn run_engine(config: &RunConfig, tool: &FakeTool) {
    let mut sinks = Sinks::open(config).unwrap();
    let mut scratch = ScratchWorkspace::init(&config.tmp_root).unwrap();
    Engine::new(config, tool, &mut sinks, &mut scratch)
        .run()
        .unwrap();
}

/// Name column of a digest-list line (after the two-space separator).
fn names(sink_content: &str) -> Vec<String> {
    sink_content
        .lines()
        .map(|l| l.split_once("  ").unwrap().1.to_string())
        .collect()
}

#[test]
fn min_filesize_gates_hashing_but_not_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.txt"), b"0123456789").unwrap();
    fs::write(input.join("b.zip"), manifest(&[("c.txt", b"tiny!")])).unwrap();

    let out = dir.path().join("out.md5");
    let mut config = base_config(input, dir.path());
    config.min_filesize = 8;
    config.md5.path = Some(out.clone());

    let tool = FakeTool::default();
    run_engine(&config, &tool);

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("781e5e245d69b566979b86e28d23f2c7  a.txt"));
    assert!(!content.contains("c.txt"));

    // The size rule never suppresses extraction or probing.
    assert_eq!(tool.extract_count(), 1);
    assert!(tool.classified("c.txt"));
}

#[test]
fn nested_archives_keep_innermost_relative_logical_paths() {
    let dir = tempfile::tempdir().unwrap();
    let inner = manifest(&[("secret.txt", b"top secret data")]);
    let outer = manifest(&[("inner.zip", inner.as_bytes())]);
    let input = dir.path().join("outer.zip");
    fs::write(&input, outer).unwrap();

    let out = dir.path().join("out.md5");
    let mut config = base_config(input, dir.path());
    config.md5.path = Some(out.clone());
    config.md5.full_path = true;

    let tool = FakeTool::default();
    run_engine(&config, &tool);

    let content = fs::read_to_string(&out).unwrap();
    let mut recorded = names(&content);
    recorded.sort();
    assert_eq!(recorded, ["inner.zip", "outer.zip", "secret.txt"]);

    // Logical paths never leak the scratch workspace location.
    assert!(!content.contains("hd"));
    assert!(!content.contains(std::path::MAIN_SEPARATOR));
}

#[test]
fn skip_listed_archive_is_hashed_but_never_extracted() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("b.zip"), manifest(&[("c.txt", b"contents")])).unwrap();

    let out = dir.path().join("out.md5");
    let mut config = base_config(input, dir.path());
    config.archive_skip = vec!["zip".into()];
    config.md5.path = Some(out.clone());

    let tool = FakeTool::default();
    run_engine(&config, &tool);

    let content = fs::read_to_string(&out).unwrap();
    assert_eq!(names(&content), ["b.zip"]);
    assert_eq!(tool.extract_count(), 0);
}

#[test]
fn corrupt_archive_is_recoverable_and_siblings_continue() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("bad.zip"), "CORRUPT").unwrap();
    fs::write(input.join("a.txt"), b"0123456789").unwrap();

    let out = dir.path().join("out.md5");
    let mut config = base_config(input, dir.path());
    config.md5.path = Some(out.clone());

    let tool = FakeTool::default();
    run_engine(&config, &tool);

    let content = fs::read_to_string(&out).unwrap();
    let mut recorded = names(&content);
    recorded.sort();
    assert_eq!(recorded, ["a.txt", "bad.zip"]);

    // Nothing inside bad.zip became a processing root.
    assert_eq!(tool.extract_count(), 1);
    assert!(!tool.classified("c.txt"));
}

#[cfg(unix)]
#[test]
fn control_characters_are_escaped_in_every_record() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    let name = OsStr::from_bytes(b"bell\x07.txt");
    fs::write(input.join(name), b"ding").unwrap();

    let out = dir.path().join("out.sha1");
    let mut config = base_config(input, dir.path());
    config.sha1.path = Some(out.clone());

    run_engine(&config, &FakeTool::default());

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("bell\\x07.txt"));
    assert!(!content.contains('\x07'));
}

#[cfg(unix)]
#[test]
fn symlinks_are_skipped_silently() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("real.txt"), b"data").unwrap();
    std::os::unix::fs::symlink(input.join("real.txt"), input.join("link.txt")).unwrap();

    let out = dir.path().join("out.md5");
    let mut config = base_config(input, dir.path());
    config.md5.path = Some(out.clone());

    run_engine(&config, &FakeTool::default());

    assert_eq!(names(&fs::read_to_string(&out).unwrap()), ["real.txt"]);
}

#[test]
fn rds_records_carry_all_three_digests_and_fixed_fields() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir_all(input.join("sub")).unwrap();
    fs::write(input.join("sub/d.txt"), b"hello world").unwrap();

    let out = dir.path().join("out.csv");
    let mut config = base_config(input, dir.path());
    config.rds.path = Some(out.clone());

    run_engine(&config, &FakeTool::default());

    let content = fs::read_to_string(&out).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some(RDS_HEADER));
    assert_eq!(
        lines.next(),
        Some(
            r#""2aae6c35c94fcfb415dbe95f408b9ce91ee846ed","5eb63bbbe01eeed093cb22bb8f5acdc3","0d4a1185","d.txt",11,0,"WIN","""#
        )
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn fullpath_mode_uses_root_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir_all(input.join("sub")).unwrap();
    fs::write(input.join("sub/d.txt"), b"hello world").unwrap();

    let short = dir.path().join("short.md5");
    let full = dir.path().join("full.md5");
    let mut config = base_config(input, dir.path());
    config.md5.path = Some(short.clone());
    run_engine(&config, &FakeTool::default());

    config.md5.path = Some(full.clone());
    config.md5.full_path = true;
    run_engine(&config, &FakeTool::default());

    assert_eq!(names(&fs::read_to_string(&short).unwrap()), ["d.txt"]);
    assert_eq!(
        names(&fs::read_to_string(&full).unwrap()),
        [format!("sub{}d.txt", std::path::MAIN_SEPARATOR)]
    );
}

#[test]
fn reruns_produce_byte_identical_sinks() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.txt"), b"stable contents").unwrap();
    fs::write(input.join("b.zip"), manifest(&[("c.txt", b"inside")])).unwrap();

    let mut first = base_config(input.clone(), dir.path());
    first.md5.path = Some(dir.path().join("one.md5"));
    first.rds.path = Some(dir.path().join("one.csv"));
    run_engine(&first, &FakeTool::default());

    let mut second = base_config(input, dir.path());
    second.md5.path = Some(dir.path().join("two.md5"));
    second.rds.path = Some(dir.path().join("two.csv"));
    run_engine(&second, &FakeTool::default());

    assert_eq!(
        fs::read(dir.path().join("one.md5")).unwrap(),
        fs::read(dir.path().join("two.md5")).unwrap()
    );
    assert_eq!(
        fs::read(dir.path().join("one.csv")).unwrap(),
        fs::read(dir.path().join("two.csv")).unwrap()
    );
}

#[test]
fn scratch_workspace_is_removed_after_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample.zip");
    fs::write(&input, manifest(&[("c.txt", b"inside")])).unwrap();

    let tmp = dir.path().join("tmp");
    fs::create_dir(&tmp).unwrap();
    let config = base_config(input, &tmp);

    {
        let mut sinks = Sinks::open(&config).unwrap();
        let mut scratch = ScratchWorkspace::init(&config.tmp_root).unwrap();
        let tool = FakeTool::default();
        Engine::new(&config, &tool, &mut sinks, &mut scratch)
            .run()
            .unwrap();
        assert_eq!(fs::read_dir(&tmp).unwrap().count(), 1);
    }
    assert_eq!(fs::read_dir(&tmp).unwrap().count(), 0);
}
