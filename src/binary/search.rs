//! Range search over 12-byte index blocks, shared by every strategy.

use super::format::*;
use super::source::ByteSource;
use crate::region::RegionInfo;
use crate::{Error, Result};

/// Binary search `block_count` index blocks laid out from `base` for the
/// block whose `[start_ip, end_ip]` range contains `ip`.
///
/// Returns the block's data pointer, or `None` if `ip` falls in a gap.
pub fn range_search<S: ByteSource + ?Sized>(
    source: &mut S,
    base: u64,
    block_count: u32,
    ip: u32,
) -> Result<Option<DataPtr>> {
    let mut raw = [0u8; INDEX_BLOCK_LENGTH];
    let (mut low, mut high) = (0u32, block_count);

    while low < high {
        let mid = low + (high - low) / 2;
        source.read_at(base + mid as u64 * INDEX_BLOCK_LENGTH as u64, &mut raw)?;
        let block = IndexBlock::parse(&raw)?;

        if block.contains(ip) {
            return Ok(Some(block.data_ptr));
        }
        if ip < block.start_ip {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    Ok(None)
}

/// Read and decode the record a data pointer refers to.
pub fn read_record<S: ByteSource + ?Sized>(source: &mut S, ptr: DataPtr) -> Result<RegionInfo> {
    let length = ptr.length as usize;
    if length < CITY_ID_LENGTH {
        return Err(Error::corrupt(format!(
            "data pointer at offset {} has length {}, shorter than a city id",
            ptr.offset, length
        )));
    }

    let mut record = vec![0u8; length];
    source.read_at(ptr.offset as u64, &mut record)?;
    RegionInfo::decode(&record)
}
