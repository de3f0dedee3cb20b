//! Header decoding and validation.
//!
//! ## Parsing Strategy
//!
//! The header is a run of variable-length records, so it can only be walked
//! front to back:
//! 1. Read and sanity-check the 8-byte preamble before touching any record
//! 2. Decode `entry_count` records through a bounds-checked cursor; names
//!    must end at or before the declared header end
//! 3. Check every entry's `offset + length` against the data region, per
//!    record when the region is known up front, otherwise once it is fixed
//!
//! All offset arithmetic is done in `u64`, so header values near `u32::MAX`
//! cannot wrap past a bounds check.

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, warn};

use crate::error::FormatError;

use super::structures::*;

/// Checked reader over `buf[..limit]`.
struct HeaderCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    limit: usize,
}

impl<'a> HeaderCursor<'a> {
    fn new(buf: &'a [u8], pos: usize, limit: usize) -> Self {
        Self {
            buf,
            pos,
            limit: limit.min(buf.len()),
        }
    }

    fn position(&self) -> usize {
        self.pos
    }

    /// Borrow the next `len` bytes, failing if they cross `limit`.
    fn take(&mut self, len: u64) -> Result<&'a [u8], FormatError> {
        self.take_within(len, self.limit)
    }

    /// Borrow the next `len` bytes, failing if they cross `bound` or `limit`.
    fn take_within(&mut self, len: u64, bound: usize) -> Result<&'a [u8], FormatError> {
        let bound = bound.min(self.limit);
        let end = (self.pos as u64)
            .checked_add(len)
            .filter(|&end| end <= bound as u64)
            .ok_or(FormatError::Truncated {
                offset: self.pos as u64,
                needed: len,
                available: bound.saturating_sub(self.pos) as u64,
            })?;
        // `end <= limit <= buf.len()`, so it fits in usize
        let end = end as usize;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_u32(&mut self) -> Result<u32, FormatError> {
        self.take(4).map(LittleEndian::read_u32)
    }
}

/// Read the preamble at offset 0.
pub fn read_preamble(buf: &[u8]) -> Result<Preamble, FormatError> {
    let mut cursor = HeaderCursor::new(buf, 0, buf.len());
    Ok(Preamble {
        field_a: cursor.read_u32()?,
        entry_count: cursor.read_u32()?,
    })
}

/// Fail unless `entry`'s data fits in a region of `region` bytes.
fn check_bounds(index: usize, entry: &Entry<'_>, region: u64) -> Result<(), FormatError> {
    let end = entry.data_offset as u64 + entry.data_length as u64;
    if end > region {
        return Err(FormatError::EntryOutOfBounds {
            index,
            offset: entry.data_offset,
            length: entry.data_length,
            region,
        });
    }
    Ok(())
}

/// Low-level WAD header parser.
///
/// Holds the configuration; the buffer is passed to [`WadParser::parse`] so
/// the returned index can borrow from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct WadParser {
    options: ParseOptions,
}

impl WadParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Decode and validate the complete header of `buf`.
    ///
    /// No entry is returned unless every entry passed validation.
    pub fn parse<'a>(&self, buf: &'a [u8]) -> Result<WadIndex<'a>, FormatError> {
        let preamble = read_preamble(buf)?;
        let header_limit = self.validate_preamble(&preamble, buf.len())?;

        debug!(
            "Preamble: field_a={:#x}, entry_count={}, header limit {}",
            preamble.field_a, preamble.entry_count, header_limit
        );

        // Names must lie inside the declared header even when the fixed-width
        // fields are only bounded by the buffer
        let name_bound = match self.options.variant {
            HeaderVariant::EndOffset => preamble.field_a as usize,
            HeaderVariant::Magic(_) => buf.len(),
        };
        // Known before the walk only when data starts at the declared end
        let known_region = match (self.options.variant, self.options.data_origin) {
            (HeaderVariant::EndOffset, DataOrigin::HeaderEnd) => {
                Some((buf.len() - preamble.field_a as usize) as u64)
            }
            _ => None,
        };

        // entry_count is bounded by the preamble check, so this cannot be huge
        let mut records = Vec::with_capacity(preamble.entry_count as usize);
        let mut cursor = HeaderCursor::new(buf, PREAMBLE_SIZE, header_limit);

        for index in 0..preamble.entry_count as usize {
            let name_length = cursor.read_u32()?;
            let name = cursor.take_within(name_length as u64, name_bound)?;
            let data_length = cursor.read_u32()?;
            let data_offset = cursor.read_u32()?;
            let entry = Entry {
                name,
                data_length,
                data_offset,
            };
            if let Some(region) = known_region {
                check_bounds(index, &entry, region)?;
            }
            records.push(entry);
        }

        let records_end = cursor.position();
        let data_start = self.data_start(&preamble, records_end)?;
        let data = &buf[data_start..];
        let region = data.len() as u64;

        if known_region.is_none() {
            for (index, entry) in records.iter().enumerate() {
                check_bounds(index, entry, region)?;
            }
        }

        debug!(
            "Parsed {} entries, data region {}..{}",
            records.len(),
            data_start,
            buf.len()
        );

        Ok(WadIndex::new(preamble, records, data_start, data))
    }

    /// Check the preamble against the buffer and return the offset header
    /// reads are bounded by.
    fn validate_preamble(&self, preamble: &Preamble, len: usize) -> Result<usize, FormatError> {
        let len = len as u64;
        let min_header = PREAMBLE_SIZE as u64 + preamble.entry_count as u64 * MIN_RECORD_SIZE;

        match self.options.variant {
            HeaderVariant::EndOffset => {
                let header_end = preamble.field_a as u64;
                if header_end > len {
                    return Err(FormatError::BadHeader(format!(
                        "header end {header_end} lies beyond the {len}-byte archive"
                    )));
                }
                if header_end < min_header {
                    return Err(FormatError::BadHeader(format!(
                        "header end {header_end} too small for {} entries",
                        preamble.entry_count
                    )));
                }
                Ok(match self.options.data_origin {
                    DataOrigin::HeaderEnd => preamble.field_a as usize,
                    DataOrigin::RecordsEnd => len as usize,
                })
            }
            HeaderVariant::Magic(magic) => {
                if preamble.field_a != magic {
                    return Err(FormatError::BadHeader(format!(
                        "magic {:#010x} does not match expected {magic:#010x}",
                        preamble.field_a
                    )));
                }
                if min_header > len {
                    return Err(FormatError::BadHeader(format!(
                        "{} entries cannot fit in a {len}-byte archive",
                        preamble.entry_count
                    )));
                }
                Ok(len as usize)
            }
        }
    }

    /// Resolve where the data region begins once all records are read.
    fn data_start(&self, preamble: &Preamble, records_end: usize) -> Result<usize, FormatError> {
        let HeaderVariant::EndOffset = self.options.variant else {
            return Ok(records_end);
        };

        let header_end = preamble.field_a as usize;
        if records_end != header_end {
            if self.options.strict {
                return Err(FormatError::HeaderMismatch {
                    records_end: records_end as u64,
                    header_end: header_end as u64,
                });
            }
            warn!(
                "Header records end at {}, header declares {}; ignoring",
                records_end, header_end
            );
        }

        Ok(match self.options.data_origin {
            DataOrigin::HeaderEnd => header_end,
            DataOrigin::RecordsEnd => records_end,
        })
    }
}
