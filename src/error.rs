//! Error types for loading, parsing and extracting WAD archives.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error returned by the library.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure while opening the archive or writing output
    #[error(transparent)]
    Io(#[from] IoError),

    /// The archive could not be mapped or buffered
    #[error("Cannot load {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive header is malformed
    #[error(transparent)]
    Format(#[from] FormatError),

    /// An entry name cannot be turned into a safe output path
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Filesystem errors, always carrying the path involved.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("Cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file exists and overwriting is forbidden
    #[error("Error creating file {}: file already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Error creating file {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sink accepted fewer bytes than the entry holds
    #[error("Error writing file {}: wrote {written} of {expected} bytes", path.display())]
    ShortWrite {
        path: PathBuf,
        expected: u64,
        written: u64,
    },
}

/// Header decoding and validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A read would run past the end of the readable region
    #[error("Truncated archive: need {needed} bytes at offset {offset}, only {available} available")]
    Truncated {
        offset: u64,
        needed: u64,
        available: u64,
    },

    #[error("Bad header, wrong file? ({0})")]
    BadHeader(String),

    /// Entry data does not fit in the data region
    #[error(
        "Entry {index} out of bounds: offset {offset} + length {length} exceeds data region of {region} bytes"
    )]
    EntryOutOfBounds {
        index: usize,
        offset: u32,
        length: u32,
        region: u64,
    },

    /// Records end somewhere other than the declared header end (strict mode only)
    #[error("Header records end at {records_end}, but header declares end at {header_end}")]
    HeaderMismatch { records_end: u64, header_end: u64 },
}

/// Entry-name to output-path failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Entry name {name:?} is not a valid path on this platform")]
    InvalidEncoding { name: String },

    #[error("Entry name {name:?} resolves outside the output directory")]
    Escapes { name: String },

    #[error("Entry name is empty")]
    Empty,
}

impl Error {
    /// Whether this error is an `AlreadyExists` anti-clobber refusal.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::Io(IoError::AlreadyExists { .. }))
    }
}
