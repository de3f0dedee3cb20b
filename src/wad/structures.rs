use std::ops::Range;

/// Size of the preamble: two little-endian u32 fields
pub const PREAMBLE_SIZE: usize = 8;

/// Smallest record the header check accounts for: name length (4), at least
/// one name byte, data length (4) and data offset (4)
pub const MIN_RECORD_SIZE: u64 = 13;

/// Default first field for the magic-tagged variant, the ASCII tag `AGAR`
pub const DEFAULT_MAGIC: u32 = u32::from_le_bytes(*b"AGAR");

/// How the first preamble field is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderVariant {
    /// Field A is the byte offset where the header ends
    #[default]
    EndOffset,
    /// Field A must equal the given constant
    Magic(u32),
}

/// Where entry data offsets are measured from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataOrigin {
    /// Right after the last header record
    #[default]
    RecordsEnd,
    /// At the declared `header_end`
    HeaderEnd,
}

/// Parser configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub variant: HeaderVariant,
    pub data_origin: DataOrigin,
    /// Treat records that do not end exactly at `header_end` as an error
    pub strict: bool,
}

/// The first 8 bytes of an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    /// `header_end` or the magic value, depending on the variant
    pub field_a: u32,
    pub entry_count: u32,
}

/// One archive member, borrowed from the archive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    /// Raw name bytes; a relative path using `/` separators
    pub name: &'a [u8],
    pub data_length: u32,
    /// Offset relative to the start of the data region
    pub data_offset: u32,
}

impl Entry<'_> {
    pub fn name_length(&self) -> usize {
        self.name.len()
    }

    /// Name for display, with invalid UTF-8 replaced
    pub fn display_name(&self) -> String {
        String::from_utf8_lossy(self.name).into_owned()
    }

    /// Byte range inside the data region.
    ///
    /// Only meaningful for entries that passed validation.
    pub fn data_range(&self) -> Range<usize> {
        let start = self.data_offset as usize;
        start..start.saturating_add(self.data_length as usize)
    }
}

/// Parsed and validated archive header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadIndex<'a> {
    pub preamble: Preamble,
    pub entries: Vec<Entry<'a>>,
    /// Absolute offset of the data region in the archive
    pub data_start: usize,
    data: &'a [u8],
}

impl<'a> WadIndex<'a> {
    pub(crate) fn new(
        preamble: Preamble,
        entries: Vec<Entry<'a>>,
        data_start: usize,
        data: &'a [u8],
    ) -> Self {
        Self {
            preamble,
            entries,
            data_start,
            data,
        }
    }

    /// The data region every entry offset is relative to
    pub fn data_region(&self) -> &'a [u8] {
        self.data
    }

    /// Contents of a validated entry.
    pub fn contents(&self, entry: &Entry<'_>) -> Option<&'a [u8]> {
        self.data.get(entry.data_range())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry lengths
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.data_length as u64).sum()
    }
}
