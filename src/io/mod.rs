//! Archive loading.
//!
//! An archive is exposed as one immutable, fully addressable byte view. The
//! parser never sees a file handle, only the bytes.

mod buffered;
mod mapped;

pub use buffered::BufferedArchive;
pub use mapped::MappedArchive;

use std::path::Path;

use crate::error::Result;

/// Read-only view over a fully loaded archive
pub trait ArchiveSource: Send + Sync {
    /// The whole archive
    fn as_bytes(&self) -> &[u8];

    /// Get the total size of the archive
    fn size(&self) -> u64 {
        self.as_bytes().len() as u64
    }
}

/// How an archive file is brought into memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Memory-map the file
    #[default]
    Map,
    /// Read the whole file into an owned buffer
    Read,
}

/// Load `path` with the requested mode.
pub fn open(path: &Path, mode: LoadMode) -> Result<Box<dyn ArchiveSource>> {
    let source: Box<dyn ArchiveSource> = match mode {
        LoadMode::Map => Box::new(MappedArchive::open(path)?),
        LoadMode::Read => Box::new(BufferedArchive::open(path)?),
    };
    Ok(source)
}

impl<T: ArchiveSource + ?Sized> ArchiveSource for Box<T> {
    fn as_bytes(&self) -> &[u8] {
        (**self).as_bytes()
    }
}
