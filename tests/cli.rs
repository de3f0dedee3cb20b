//! Runs the built binary and checks output and exit codes.

mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

use common::{build_wad, two_entry_wad};

fn unwad(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_unwad"))
        .args(args)
        .current_dir(cwd)
        .env_remove("UNWAD_OUTPUT")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn extracts_into_current_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("game.wad"), two_entry_wad()).unwrap();

    let output = unwad(dir.path(), &["game.wad"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 2 files"), "{stdout}");
    assert!(stdout.contains("(size 5 bytes) extracted."), "{stdout}");
    assert!(stdout.contains("Directory"), "{stdout}");
    assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"hello");
    assert_eq!(fs::read(dir.path().join("sub/b.txt")).unwrap(), b"xyz");
}

#[test]
fn lists_without_extracting() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("game.wad"), two_entry_wad()).unwrap();

    let output = unwad(dir.path(), &["-l", "game.wad"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "a.txt\nsub/b.txt\n"
    );
    assert!(!dir.path().join("a.txt").exists());
}

#[test]
fn quiet_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("game.wad"), two_entry_wad()).unwrap();

    let output = unwad(dir.path(), &["-q", "-d", "out", "game.wad"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read(dir.path().join("out/a.txt")).unwrap(), b"hello");
}

#[test]
fn usage_error_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(unwad(dir.path(), &[]).status.code(), Some(2));
}

#[test]
fn missing_file_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let output = unwad(dir.path(), &["missing.wad"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.wad"));
}

#[test]
fn bad_header_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("junk.wad"), b"this is not an archive at all").unwrap();

    let output = unwad(dir.path(), &["junk.wad"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Bad header"));
}

#[test]
fn traversal_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("evil.wad"),
        build_wad(&[(b"../evil.txt", 1, 0)], b"x"),
    )
    .unwrap();

    let output = unwad(dir.path(), &["evil.wad"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn existing_file_fails_then_overwrite_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("game.wad"), two_entry_wad()).unwrap();
    fs::write(dir.path().join("a.txt"), b"keep").unwrap();

    let output = unwad(dir.path(), &["game.wad"]);
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"keep");

    let output = unwad(dir.path(), &["-o", "game.wad"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"hello");
}

#[test]
fn keep_going_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("game.wad"), two_entry_wad()).unwrap();
    fs::write(dir.path().join("a.txt"), b"keep").unwrap();

    let output = unwad(dir.path(), &["-k", "game.wad"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read(dir.path().join("sub/b.txt")).unwrap(), b"xyz");
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 of 2 entries failed"));
}
