//! WAD archive parsing and extraction.
//!
//! ## Architecture
//!
//! - [`structures`]: preamble, entry and configuration types
//! - [`parser`]: bounds-checked decoding and validation of the header
//! - [`path`]: entry name to output path resolution
//! - [`extractor`]: writing validated entries to disk
//!
//! ## WAD Format Overview
//!
//! All integers are little-endian u32:
//!
//! ```text
//! 0..4   header_end, or a magic constant in the magic-tagged variant
//! 4..8   entry_count
//! 8..H   entry_count records: name_length, name bytes, data_length, data_offset
//! H..EOF concatenated file contents
//! ```
//!
//! Records are variable length, so the header is decoded sequentially. Data
//! offsets are relative to the start of the data region.
//!
//! ## Limitations
//!
//! - Read only; archives cannot be written
//! - No compression or encryption (the format has neither)

pub mod extractor;
pub mod parser;
pub mod path;
pub mod structures;

pub use extractor::{
    ConsoleProgress, EntryFailure, ExtractOptions, ExtractSummary, OnError, Overwrite, Progress,
    WadExtractor,
};
pub use parser::WadParser;
pub use structures::*;
