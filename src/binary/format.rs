//! Binary format constants and decoding primitives.

use crate::{Error, Result};

/// Size of the super block (first and last index block pointers).
pub const SUPER_BLOCK_LENGTH: usize = 8;

/// Size of one index block: start ip, end ip, packed data pointer.
pub const INDEX_BLOCK_LENGTH: usize = 12;

/// Size of one header table entry: start ip, index block pointer.
pub const HEADER_ENTRY_LENGTH: usize = 8;

/// Size of the fixed header table region following the super block.
pub const TOTAL_HEADER_LENGTH: usize = 8192;

/// Maximum number of header table entries.
pub const MAX_HEADER_ENTRIES: usize = TOTAL_HEADER_LENGTH / HEADER_ENTRY_LENGTH;

/// Size of the city id prefix of every data record.
pub const CITY_ID_LENGTH: usize = 4;

/// Mask selecting the record offset out of a packed data pointer.
pub const DATA_OFFSET_MASK: u32 = 0x00FF_FFFF;

/// Read an unsigned little-endian `u32` at `offset`.
///
/// Offsets past the end of `buf` mean an index pointer went astray.
#[inline]
pub fn decode_u32_le(buf: &[u8], offset: usize) -> Result<u32> {
    offset
        .checked_add(4)
        .and_then(|end| buf.get(offset..end))
        .and_then(|bytes| bytes.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| {
            Error::corrupt(format!(
                "u32 at offset {} is out of bounds for {} bytes",
                offset,
                buf.len()
            ))
        })
}

/// Packed data pointer: 24-bit record offset, 8-bit record length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataPtr {
    /// Absolute byte offset of the record
    pub offset: u32,
    /// Record length in bytes (city id included)
    pub length: u8,
}

impl DataPtr {
    /// Build a pointer, or `None` if `offset` does not fit in 24 bits.
    pub fn new(offset: u32, length: u8) -> Option<Self> {
        (offset <= DATA_OFFSET_MASK).then_some(Self { offset, length })
    }

    /// Split a raw pointer into offset and length.
    #[inline]
    pub fn unpack(raw: u32) -> Self {
        Self {
            offset: raw & DATA_OFFSET_MASK,
            length: (raw >> 24) as u8,
        }
    }

    /// Inverse of [`DataPtr::unpack`].
    #[inline]
    pub fn pack(self) -> u32 {
        ((self.length as u32) << 24) | (self.offset & DATA_OFFSET_MASK)
    }
}

/// One 12-byte index block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBlock {
    /// First address covered (inclusive)
    pub start_ip: u32,
    /// Last address covered (inclusive)
    pub end_ip: u32,
    /// Where the region record lives
    pub data_ptr: DataPtr,
}

impl IndexBlock {
    /// Decode a block from the first 12 bytes of `buf`.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        Ok(Self {
            start_ip: decode_u32_le(buf, 0)?,
            end_ip: decode_u32_le(buf, 4)?,
            data_ptr: DataPtr::unpack(decode_u32_le(buf, 8)?),
        })
    }

    /// Whether `ip` lies within `[start_ip, end_ip]`.
    pub fn contains(&self, ip: u32) -> bool {
        self.start_ip <= ip && ip <= self.end_ip
    }
}

/// The 8-byte super block at the start of every index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperBlock {
    /// Byte offset of the first index block
    pub first_index_ptr: u32,
    /// Byte offset of the last index block
    pub last_index_ptr: u32,
}

impl SuperBlock {
    /// Decode and validate the super block from the start of `buf`.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < SUPER_BLOCK_LENGTH {
            return Err(Error::corrupt(format!(
                "super block truncated: expected {} bytes, got {}",
                SUPER_BLOCK_LENGTH,
                buf.len()
            )));
        }

        let super_block = Self {
            first_index_ptr: decode_u32_le(buf, 0)?,
            last_index_ptr: decode_u32_le(buf, 4)?,
        };
        super_block.validate()?;
        Ok(super_block)
    }

    /// Check pointer ordering and block alignment.
    pub fn validate(&self) -> Result<()> {
        if self.last_index_ptr < self.first_index_ptr {
            return Err(Error::corrupt(format!(
                "last index pointer {} precedes first index pointer {}",
                self.last_index_ptr, self.first_index_ptr
            )));
        }
        if (self.last_index_ptr - self.first_index_ptr) as usize % INDEX_BLOCK_LENGTH != 0 {
            return Err(Error::corrupt(format!(
                "index span {}..{} is not a whole number of blocks",
                self.first_index_ptr, self.last_index_ptr
            )));
        }
        Ok(())
    }

    /// Check that every index block lies within a source of `source_len` bytes.
    pub fn check_within(&self, source_len: u64) -> Result<()> {
        if self.index_end() > source_len {
            return Err(Error::corrupt(format!(
                "index blocks end at {} but the source is only {} bytes",
                self.index_end(),
                source_len
            )));
        }
        Ok(())
    }

    /// Number of index blocks.
    pub fn total_blocks(&self) -> u32 {
        (self.last_index_ptr - self.first_index_ptr) / INDEX_BLOCK_LENGTH as u32 + 1
    }

    /// Byte offset just past the last index block.
    pub fn index_end(&self) -> u64 {
        self.last_index_ptr as u64 + INDEX_BLOCK_LENGTH as u64
    }

    /// Whether `ptr` addresses the start of an index block.
    pub fn is_block_ptr(&self, ptr: u32) -> bool {
        ptr >= self.first_index_ptr
            && ptr <= self.last_index_ptr
            && (ptr - self.first_index_ptr) as usize % INDEX_BLOCK_LENGTH == 0
    }
}
