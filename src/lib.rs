//! # unwad
//!
//! Extract every file from a WAD game asset archive.
//!
//! A WAD is a single header describing a sequence of variable-length records
//! (name, size, offset), followed by the concatenated file contents. The
//! archive is loaded as one immutable byte view, its header is decoded and
//! validated completely, and only then are entries written below an output
//! directory.
//!
//! ## Features
//!
//! - Memory-mapped or fully buffered loading
//! - Both preamble variants: declared header end, or a magic constant
//! - Overflow-safe bounds checks on every header value
//! - Path traversal protection for entry names
//! - Anti-clobber output by default, optional concurrent writes
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use unwad::{ConsoleProgress, ExtractOptions, MappedArchive, ParseOptions, WadExtractor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let archive = MappedArchive::open(Path::new("game.wad"))?;
//!     let extractor = WadExtractor::new(archive, ParseOptions::default());
//!
//!     for entry in extractor.list_files()? {
//!         println!("{}", entry.display_name());
//!     }
//!
//!     let summary = extractor
//!         .extract_all(&ExtractOptions::default(), &ConsoleProgress::default())
//!         .await?;
//!     println!("{} files", summary.files);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod wad;

pub use cli::Cli;
pub use error::{Error, FormatError, IoError, PathError, Result};
pub use io::{ArchiveSource, BufferedArchive, LoadMode, MappedArchive};
pub use wad::{
    ConsoleProgress, DataOrigin, Entry, EntryFailure, ExtractOptions, ExtractSummary,
    HeaderVariant, OnError, Overwrite, ParseOptions, Progress, WadExtractor, WadIndex, WadParser,
};
