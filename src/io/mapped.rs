use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use super::ArchiveSource;
use crate::error::{Error, IoError, Result};

/// Memory-mapped archive file
///
/// The file descriptor is closed as soon as the mapping is established; the
/// mapping lives as long as this value.
pub struct MappedArchive {
    /// `None` for an empty file, which cannot be mapped everywhere
    mmap: Option<Mmap>,
}

impl MappedArchive {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| IoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let size = file
            .metadata()
            .map_err(|source| IoError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        debug!("Mapping archive: {:?} (size: {} bytes)", path, size);

        if size == 0 {
            return Ok(Self { mmap: None });
        }

        // SAFETY: the mapping is read-only and private to this process. Another
        // process truncating the file while it is mapped is outside our control,
        // as for every mmap-based reader.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| Error::Resource {
            path: path.to_path_buf(),
            source,
        })?;
        drop(file);

        Ok(Self { mmap: Some(mmap) })
    }
}

impl ArchiveSource for MappedArchive {
    fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }
}
