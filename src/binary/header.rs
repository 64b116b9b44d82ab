//! Header table used by the b-tree search to narrow the index window.

use super::format::*;
use super::source::ByteSource;
use crate::{Error, Result};

/// In-memory copy of the header table.
///
/// Entry `i` says that the index block at `index_ptrs[i]` starts at
/// `start_ips[i]`. Both sequences are sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderTable {
    start_ips: Vec<u32>,
    index_ptrs: Vec<u32>,
}

impl HeaderTable {
    /// Decode the header region. Stops at the first zero pointer or after
    /// [`MAX_HEADER_ENTRIES`] entries.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let mut table = Self::default();

        for entry in buf.chunks_exact(HEADER_ENTRY_LENGTH).take(MAX_HEADER_ENTRIES) {
            let index_ptr = decode_u32_le(entry, 4)?;
            if index_ptr == 0 {
                break;
            }
            table.start_ips.push(decode_u32_le(entry, 0)?);
            table.index_ptrs.push(index_ptr);
        }

        Ok(table)
    }

    /// Read the header region through `source` and check it against the
    /// super block.
    ///
    /// The header region must end before the first index block. Since the
    /// index is known to fit in the source, the read then cannot run short.
    pub fn load<S: ByteSource + ?Sized>(source: &mut S, super_block: &SuperBlock) -> Result<Self> {
        let header_end = SUPER_BLOCK_LENGTH + TOTAL_HEADER_LENGTH;
        if (super_block.first_index_ptr as usize) < header_end {
            return Err(Error::corrupt(format!(
                "first index block at {} overlaps the header table ending at {}",
                super_block.first_index_ptr, header_end
            )));
        }

        let mut buf = vec![0u8; TOTAL_HEADER_LENGTH];
        source.read_at(SUPER_BLOCK_LENGTH as u64, &mut buf)?;

        let table = Self::parse(&buf)?;
        table.validate(super_block)?;

        log::debug!("Loaded header table with {} entries", table.len());
        Ok(table)
    }

    /// Check that entries are sorted and point at real index blocks.
    pub fn validate(&self, super_block: &SuperBlock) -> Result<()> {
        if let Some(&ptr) = self
            .index_ptrs
            .iter()
            .find(|&&ptr| !super_block.is_block_ptr(ptr))
        {
            return Err(Error::corrupt(format!(
                "header entry points at {} which is not an index block in {}..={}",
                ptr, super_block.first_index_ptr, super_block.last_index_ptr
            )));
        }

        let sorted = |v: &[u32]| v.windows(2).all(|w| w[0] <= w[1]);
        if !sorted(&self.start_ips) || !sorted(&self.index_ptrs) {
            return Err(Error::corrupt("header table entries are not sorted"));
        }

        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.start_ips.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.start_ips.is_empty()
    }

    /// Find the window `(sptr, eptr)` of index blocks that may hold `ip`.
    ///
    /// Both pointers address index blocks and the window includes the block
    /// at `eptr`. Returns `None` when the table is empty.
    pub fn bracket(&self, ip: u32) -> Option<(u32, u32)> {
        let len = self.len();
        match len {
            0 => return None,
            1 => return Some((self.index_ptrs[0], self.index_ptrs[0])),
            _ => {}
        }

        let (mut low, mut high) = (0usize, len - 1);
        while low <= high {
            let mid = (low + high) >> 1;
            let start_ip = self.start_ips[mid];

            if ip == start_ip {
                return Some(self.window(mid.saturating_sub(1)));
            }

            if ip < start_ip {
                if mid == 0 {
                    return Some(self.window(0));
                }
                if ip > self.start_ips[mid - 1] {
                    return Some(self.window(mid - 1));
                }
                high = mid - 1;
            } else {
                if mid == len - 1 {
                    return Some(self.window(len - 2));
                }
                if ip <= self.start_ips[mid + 1] {
                    return Some(self.window(mid));
                }
                low = mid + 1;
            }
        }

        None
    }

    fn window(&self, i: usize) -> (u32, u32) {
        (self.index_ptrs[i], self.index_ptrs[i + 1])
    }
}
