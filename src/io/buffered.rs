use std::path::Path;

use tracing::debug;

use super::ArchiveSource;
use crate::error::{IoError, Result};

/// Archive read completely into memory
pub struct BufferedArchive {
    data: Vec<u8>,
}

impl BufferedArchive {
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|source| IoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read archive: {:?} (size: {} bytes)", path, data.len());
        Ok(Self { data })
    }

    /// Wrap bytes that are already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl ArchiveSource for BufferedArchive {
    fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
