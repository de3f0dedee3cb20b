#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use unwad::Progress;

/// Build an end-offset WAD with the given records and data region.
pub fn build_wad(records: &[(&[u8], u32, u32)], data: &[u8]) -> Vec<u8> {
    let mut header = Vec::new();
    for (name, length, offset) in records {
        header.extend_from_slice(&(name.len() as u32).to_le_bytes());
        header.extend_from_slice(name);
        header.extend_from_slice(&length.to_le_bytes());
        header.extend_from_slice(&offset.to_le_bytes());
    }

    let header_end = 8 + header.len() as u32;
    let mut out = Vec::new();
    out.extend_from_slice(&header_end.to_le_bytes());
    out.extend_from_slice(&(records.len() as u32).to_le_bytes());
    out.extend_from_slice(&header);
    out.extend_from_slice(data);
    out
}

/// The two-entry archive: `a.txt` = "hello", `sub/b.txt` = "xyz".
pub fn two_entry_wad() -> Vec<u8> {
    build_wad(&[(b"a.txt", 5, 0), (b"sub/b.txt", 3, 5)], b"helloxyz")
}

/// Collects progress events for assertions
#[derive(Default)]
pub struct RecordingProgress {
    pub directories: Mutex<Vec<String>>,
    pub files: Mutex<Vec<(String, u64)>>,
}

impl Progress for RecordingProgress {
    fn directory_created(&self, path: &Path) {
        self.directories
            .lock()
            .unwrap()
            .push(path.to_string_lossy().into_owned());
    }

    fn file_extracted(&self, path: &Path, size: u64) {
        self.files
            .lock()
            .unwrap()
            .push((path.to_string_lossy().into_owned(), size));
    }
}

/// Count regular files below `root`.
pub fn count_files(root: &Path) -> usize {
    let mut count = 0;
    for entry in std::fs::read_dir(root).unwrap() {
        let entry = entry.unwrap();
        let kind = entry.file_type().unwrap();
        if kind.is_dir() {
            count += count_files(&entry.path());
        } else if kind.is_file() {
            count += 1;
        }
    }
    count
}
